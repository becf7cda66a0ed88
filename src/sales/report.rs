//! Sales report tables

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use super::{CustomerSpend, Period, SalesSummary};

impl SalesSummary<'_> {
    /// Writes the per-period totals as a table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> io::Result<()> {
        let mut builder = Builder::default();

        builder.push_record(["Period", "Sales"]);

        for period in Period::ALL {
            builder.push_record([period.label().to_string(), format!("{}", self.get(period))]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..), Alignment::right());

        writeln!(out, "{table}")
    }
}

/// Writes a customer spend ranking as a table.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_ranking(mut out: impl io::Write, ranking: &[CustomerSpend<'_>]) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["", "Customer", "Total Spending"]);

    for (rank, spend) in ranking.iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", rank + 1),
            spend.name.clone(),
            format!("{}", spend.total),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..), Alignment::right());

    writeln!(out, "{table}")
}
