// src/extract/mod.rs
//! Markup → structured data. Everything here is pure: it takes markup that
//! a page driver already fetched and never touches the network.

pub mod links;
pub mod table;
pub mod tiles;

pub use links::{agency_link, business_case_link, document_stem, investment_links};
pub use table::{extract, extract_table, table_markup, InvestmentRecord, InvestmentTable};
pub use tiles::{extract_agency_tiles, AgencyTile};
