//! Terminal shell
//!
//! A line-oriented front end over a [`Register`]. Each input line is one [`Command`];
//! output is written as tables to any [`io::Write`].

use std::{
    io::{self, BufRead},
    ops::Range,
};

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;
use tracing::warn;

use crate::{
    clock::Clock,
    editing::{Draft, EditError},
    ledger::LedgerError,
    pricing::PricingError,
    receipt::{Receipt, ReceiptError, write_cart},
    register::{Register, RegisterError},
    sales::report::write_ranking,
    transactions::TransactionId,
};

pub use command::{Command, CommandError, HELP};

mod command;

/// Errors raised while running a shell command.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The line is not a valid command.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The register rejected the operation.
    #[error(transparent)]
    Register(#[from] RegisterError),

    /// A draft could not be totalled for display.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A receipt could not be rendered.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// A typed date does not exist in the register's time zone.
    #[error("invalid date: {0}")]
    Date(#[from] jiff::Error),

    /// Output could not be written.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// What the shell should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Read another line.
    Continue,

    /// Stop reading.
    Quit,
}

/// Interactive session over a register.
#[derive(Debug)]
pub struct Shell<C> {
    register: Register<C>,

    /// Transaction waiting for a `yes` before it is deleted
    pending_delete: Option<TransactionId>,
}

impl<C: Clock> Shell<C> {
    /// Start a session.
    pub fn new(register: Register<C>) -> Self {
        Self {
            register,
            pending_delete: None,
        }
    }

    /// The register being driven.
    pub fn register(&self) -> &Register<C> {
        &self.register
    }

    /// Read commands from `input` until it ends or `quit` is entered.
    ///
    /// Rejected commands are reported on `out` and the session carries on.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run(&mut self, input: impl BufRead, mut out: impl io::Write) -> io::Result<()> {
        writeln!(out, "Type 'help' for commands.")?;

        for line in input.lines() {
            let line = line?;

            match self.handle_line(&line, &mut out) {
                Ok(Outcome::Continue) => {}
                Ok(Outcome::Quit) => break,
                Err(ShellError::Io(err)) => return Err(err),
                Err(err) => {
                    warn!(command = line.trim(), error = %err, "command rejected");

                    writeln!(out, "error: {err}")?;
                }
            }
        }

        out.flush()
    }

    /// Run one input line.
    ///
    /// A line following `delete <id>` is read as the confirmation: `yes` deletes, anything
    /// else keeps the transaction.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] if the line does not parse or the register rejects it.
    pub fn handle_line(
        &mut self,
        line: &str,
        out: &mut impl io::Write,
    ) -> Result<Outcome, ShellError> {
        if let Some(id) = self.pending_delete.take() {
            if line.trim().eq_ignore_ascii_case("yes") {
                self.register.delete_transaction(id)?;

                writeln!(out, "Deleted transaction #{id}")?;
            } else {
                writeln!(out, "Kept transaction #{id}")?;
            }

            return Ok(Outcome::Continue);
        }

        if line.trim().is_empty() {
            return Ok(Outcome::Continue);
        }

        let command: Command = line.parse()?;

        self.execute(command, out)
    }

    /// Run a parsed command.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] if the register rejects the command or output fails.
    pub fn execute(
        &mut self,
        command: Command,
        out: &mut impl io::Write,
    ) -> Result<Outcome, ShellError> {
        match command {
            Command::Products => self.write_products(out)?,
            Command::Customers => self.write_customers(out)?,
            Command::Add { product, quantity } => {
                let line = match quantity {
                    Some(raw) => self.register.add_to_cart_raw(product, true, &raw)?,
                    None => self.register.add_to_cart_raw(product, false, "")?,
                };

                writeln!(out, "{} x{} in cart", line.name, line.quantity)?;
            }
            Command::Clear => {
                self.register.clear_cart();

                writeln!(out, "Cart cleared")?;
            }
            Command::Cart => {
                writeln!(
                    out,
                    "Customer: {}",
                    self.register.selected_customer()?.name
                )?;

                write_cart(&mut *out, self.register.cart())?;
            }
            Command::Customer(customer_id) => {
                let customer = self.register.select_customer(customer_id)?;

                writeln!(out, "Selected {}", customer.name)?;
            }
            Command::Checkout => {
                let id = self.register.checkout()?;

                self.write_transaction(id, out)?;
            }
            Command::Transactions => self.write_transactions(out)?,
            Command::Show(id) => match self.register.draft(id) {
                Some(draft) => write_draft(draft, &self.register, out)?,
                None => self.write_transaction(id, out)?,
            },
            Command::Edit(id) => {
                let draft = self.register.begin_edit(id)?.clone();

                write_draft(&draft, &self.register, out)?;
            }
            Command::Qty { id, line, quantity } => {
                let index = line.saturating_sub(1);
                let draft = self
                    .register
                    .edit_quantity_raw(id, index, &quantity)
                    .map_err(|err| match err {
                        RegisterError::Edit(EditError::NoSuchLine(id, _)) => {
                            RegisterError::Edit(EditError::NoSuchLine(id, line))
                        }
                        other => other,
                    })?
                    .clone();

                write_draft(&draft, &self.register, out)?;
            }
            Command::Who { id, customer } => {
                let draft = self.register.edit_customer(id, customer)?.clone();

                write_draft(&draft, &self.register, out)?;
            }
            Command::Date { id, date } => {
                let at = date.to_zoned(self.register.time_zone())?.timestamp();
                let draft = self.register.edit_date(id, at)?.clone();

                write_draft(&draft, &self.register, out)?;
            }
            Command::Save(id) => {
                self.register.save_edit(id)?;

                writeln!(out, "Saved transaction #{id}")?;

                self.write_transaction(id, out)?;
            }
            Command::Cancel(id) => {
                self.register.cancel_edit(id)?;

                writeln!(out, "Discarded changes to transaction #{id}")?;
            }
            Command::Delete(id) => {
                if self.register.transaction(id).is_none() {
                    return Err(RegisterError::Ledger(LedgerError::NotFound(id)).into());
                }

                if self.register.is_editing(id) {
                    return Err(RegisterError::Edit(EditError::Editing(id)).into());
                }

                self.pending_delete = Some(id);

                writeln!(out, "Delete transaction #{id}? Type 'yes' to confirm.")?;
            }
            Command::Sales => {
                self.register.sales_summary()?.write_to(&mut *out)?;
            }
            Command::Ranking => {
                write_ranking(&mut *out, &self.register.customer_ranking()?)?;
            }
            Command::Help => write!(out, "{HELP}")?,
            Command::Quit => return Ok(Outcome::Quit),
        }

        Ok(Outcome::Continue)
    }

    fn write_products(&self, out: &mut impl io::Write) -> Result<(), ShellError> {
        let mut builder = Builder::default();

        builder.push_record(["Id", "Product", "Price"]);

        for product in self.register.catalog().products() {
            builder.push_record([
                product.id.to_string(),
                product.name.clone(),
                format!("{}", product.price),
            ]);
        }

        write_table(out, builder, 2..3)
    }

    fn write_customers(&self, out: &mut impl io::Write) -> Result<(), ShellError> {
        let selected = self.register.selected_customer()?.id;
        let mut builder = Builder::default();

        builder.push_record(["", "Id", "Customer"]);

        for customer in self.register.catalog().customers() {
            let marker = if customer.id == selected { "*" } else { "" };

            builder.push_record([
                marker.to_string(),
                customer.id.to_string(),
                customer.name.clone(),
            ]);
        }

        write_table(out, builder, 1..2)
    }

    fn write_transactions(&self, out: &mut impl io::Write) -> Result<(), ShellError> {
        let time_zone = self.register.time_zone();
        let mut builder = Builder::default();

        builder.push_record(["Id", "Date", "Customer", "Lines", "Total", "State"]);

        for transaction in self.register.transactions() {
            let date = transaction.date().to_zoned(time_zone.clone());
            let state = if self.register.is_editing(transaction.id()) {
                "editing"
            } else {
                ""
            };

            builder.push_record([
                transaction.id().to_string(),
                date.strftime("%Y-%m-%d %H:%M").to_string(),
                transaction.customer_name().to_string(),
                transaction.order_lines().len().to_string(),
                format!("{}", transaction.grand_total()),
                state.to_string(),
            ]);
        }

        write_table(out, builder, 3..5)
    }

    fn write_transaction(
        &self,
        id: TransactionId,
        out: &mut impl io::Write,
    ) -> Result<(), ShellError> {
        let transaction = self
            .register
            .transaction(id)
            .ok_or(RegisterError::Ledger(LedgerError::NotFound(id)))?;

        Receipt::new(transaction, self.register.time_zone()).write_to(&mut *out)?;

        Ok(())
    }
}

fn write_draft<C: Clock>(
    draft: &Draft,
    register: &Register<C>,
    out: &mut impl io::Write,
) -> Result<(), ShellError> {
    let preview = draft.to_transaction()?;

    writeln!(out, "Editing (unsaved):")?;

    Receipt::new(&preview, register.time_zone()).write_to(&mut *out)?;

    Ok(())
}

/// Writes a table with the `right` columns right-aligned.
fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right: Range<usize>,
) -> Result<(), ShellError> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(right), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}
