use chrono::NaiveDate;
use serde::Serialize;
use std::io;
use thiserror::Error;

use super::display::{format_price, AreaUnit};
use super::domain::Listing;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write csv row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export: {0}")]
    Io(#[from] io::Error),
}

/// One data-grid row as shown in the list view.
#[derive(Debug, Serialize)]
struct GridRow<'a> {
    id: u32,
    housing_type: &'static str,
    name: &'a str,
    deal_type: &'static str,
    price: String,
    area: String,
    grade: &'static str,
    final_score: String,
    listed_on: NaiveDate,
}

impl<'a> GridRow<'a> {
    fn from_listing(listing: &'a Listing, unit: AreaUnit) -> Self {
        Self {
            id: listing.id().0,
            housing_type: listing.housing_type().label(),
            name: listing.name(),
            deal_type: listing.deal_type().label(),
            price: format_price(listing.price()),
            area: unit.format(listing.size()),
            grade: listing.grade().letter(),
            final_score: format!("{:.1}", listing.final_score()),
            listed_on: listing.listed_on(),
        }
    }
}

/// Write the filtered view as CSV with a header row. Returns rows written.
pub fn write_grid<'a, W, I>(writer: W, listings: I, unit: AreaUnit) -> Result<usize, ExportError>
where
    W: io::Write,
    I: IntoIterator<Item = &'a Listing>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for listing in listings {
        csv_writer.serialize(GridRow::from_listing(listing, unit))?;
        rows += 1;
    }
    csv_writer.flush()?;
    Ok(rows)
}
