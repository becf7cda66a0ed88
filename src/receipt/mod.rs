//! Receipt

use std::{fmt::Write, io};

use jiff::tz::TimeZone;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::Cart, pricing::PricingError, transactions::Transaction};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating a line or cart total.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Printable view of a committed transaction.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    transaction: &'a Transaction,

    /// Zone the transaction date is shown in
    time_zone: TimeZone,
}

impl<'a> Receipt<'a> {
    /// Create a receipt for `transaction`, showing its date in `time_zone`.
    #[must_use]
    pub fn new(transaction: &'a Transaction, time_zone: TimeZone) -> Self {
        Self {
            transaction,
            time_zone,
        }
    }

    /// The transaction being printed.
    #[must_use]
    pub fn transaction(&self) -> &'a Transaction {
        self.transaction
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let transaction = self.transaction;
        let date = transaction.date().to_zoned(self.time_zone.clone());

        writeln!(out, "\n Transaction #{}", transaction.id()).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, " Date:     {}", date.strftime("%Y-%m-%d %H:%M"))
            .map_err(|_err| ReceiptError::IO)?;
        writeln!(out, " Customer: {}", transaction.customer_name())
            .map_err(|_err| ReceiptError::IO)?;

        let mut builder = Builder::default();

        push_line_header(&mut builder);

        for (idx, line) in transaction.order_lines().iter().enumerate() {
            builder.push_record([
                format!("{:<3}", idx + 1),
                line.name().to_string(),
                line.quantity().to_string(),
                format!("{}", line.unit_price()),
                format!("{}", line.total_price()),
            ]);
        }

        write_line_table(&mut out, builder)?;

        write_total(&mut out, transaction.grand_total())
    }
}

/// Prints the lines of an open cart and its running total.
///
/// # Errors
///
/// Returns an error if a line total overflows or the table cannot be written.
pub fn write_cart(mut out: impl io::Write, cart: &Cart) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    push_line_header(&mut builder);

    for (idx, line) in cart.lines().iter().enumerate() {
        builder.push_record([
            format!("{:<3}", idx + 1),
            line.name.clone(),
            line.quantity.to_string(),
            format!("{}", line.price),
            format!("{}", line.total()?),
        ]);
    }

    write_line_table(&mut out, builder)?;

    write_total(&mut out, cart.total()?)
}

fn push_line_header(builder: &mut Builder) {
    builder.push_record(["", "Item", "Qty", "Unit Price", "Total"]);
}

fn write_line_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_total(out: &mut impl io::Write, total: Money<'_, Currency>) -> Result<(), ReceiptError> {
    writeln!(out, " \x1b[1mTotal:\x1b[0m  \x1b[1m{total}\x1b[0m\n").map_err(|_err| ReceiptError::IO)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F, cell content is left
/// untouched.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}
