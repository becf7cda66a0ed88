//! Shell command parsing

use std::str::FromStr;

use jiff::civil::DateTime;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{customers::CustomerId, products::ProductId, transactions::TransactionId};

/// Errors raised while parsing a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Nothing but whitespace.
    #[error("empty command")]
    Empty,

    /// The first word is not a command.
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    /// A required argument was left off.
    #[error("missing {0}")]
    MissingArgument(&'static str),

    /// An argument did not parse.
    #[error("invalid {name} '{value}'")]
    InvalidArgument {
        /// Argument name
        name: &'static str,

        /// Text as typed
        value: String,
    },

    /// More arguments than the command takes.
    #[error("too many arguments for '{0}'")]
    TooManyArguments(&'static str),
}

/// One shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the catalog products.
    Products,

    /// List the catalog customers.
    Customers,

    /// Add a product, one unit unless a quantity is typed.
    Add {
        /// Product to add
        product: ProductId,

        /// Quantity as typed
        quantity: Option<String>,
    },

    /// Empty the cart.
    Clear,

    /// Show the cart.
    Cart,

    /// Select the customer for the next checkout.
    Customer(CustomerId),

    /// Check the cart out.
    Checkout,

    /// List transactions.
    Transactions,

    /// Show one transaction, or its draft while editing.
    Show(TransactionId),

    /// Start editing a transaction.
    Edit(TransactionId),

    /// Change a draft line quantity.
    Qty {
        /// Transaction being edited
        id: TransactionId,

        /// Line number, counted from 1
        line: usize,

        /// Quantity as typed
        quantity: String,
    },

    /// Change the draft customer.
    Who {
        /// Transaction being edited
        id: TransactionId,

        /// Replacement customer
        customer: CustomerId,
    },

    /// Change the draft date.
    Date {
        /// Transaction being edited
        id: TransactionId,

        /// Civil date and time in the register's zone
        date: DateTime,
    },

    /// Save a draft.
    Save(TransactionId),

    /// Discard a draft.
    Cancel(TransactionId),

    /// Delete a transaction, after confirmation.
    Delete(TransactionId),

    /// Show the sales summary.
    Sales,

    /// Show the customer ranking.
    Ranking,

    /// List commands.
    Help,

    /// Leave the shell.
    Quit,
}

/// Command reference shown by `help`.
pub const HELP: &str = "\
Commands:
  products                      list products
  customers                     list customers
  add <product> [qty]           add a product to the cart
  clear                         empty the cart
  cart                          show the cart
  customer <id>                 select the customer for checkout
  checkout                      check the cart out
  transactions                  list transactions
  show <id>                     show a transaction
  edit <id>                     start editing a transaction
  qty <id> <line> <qty>         change a line quantity
  who <id> <customer>           change the customer
  date <id> <YYYY-MM-DDTHH:MM>  change the date
  save <id>                     save an edit
  cancel <id>                   discard an edit
  delete <id>                   delete a transaction (asks to confirm)
  sales                         sales summary
  ranking                       customer ranking
  help                          this list
  quit                          leave
";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: SmallVec<[&str; 4]> = line.split_whitespace().collect();
        let args = Args { words: &words };

        let Some(name) = words.first() else {
            return Err(CommandError::Empty);
        };

        let word = name.to_ascii_lowercase();

        let (command, arity) = match word.as_str() {
            "products" => (Command::Products, 0),
            "customers" => (Command::Customers, 0),
            "add" => {
                let quantity = args.word(2).map(str::to_string);

                (
                    Command::Add {
                        product: args.parse(1, "product id")?,
                        quantity,
                    },
                    2,
                )
            }
            "clear" => (Command::Clear, 0),
            "cart" => (Command::Cart, 0),
            "customer" => (Command::Customer(args.parse(1, "customer id")?), 1),
            "checkout" => (Command::Checkout, 0),
            "transactions" => (Command::Transactions, 0),
            "show" => (Command::Show(args.transaction(1)?), 1),
            "edit" => (Command::Edit(args.transaction(1)?), 1),
            "qty" => {
                let line = args.parse::<usize>(2, "line number")?;

                if line == 0 {
                    return Err(CommandError::InvalidArgument {
                        name: "line number",
                        value: "0".to_string(),
                    });
                }

                (
                    Command::Qty {
                        id: args.transaction(1)?,
                        line,
                        quantity: args.required(3, "quantity")?.to_string(),
                    },
                    3,
                )
            }
            "who" => (
                Command::Who {
                    id: args.transaction(1)?,
                    customer: args.parse(2, "customer id")?,
                },
                2,
            ),
            "date" => (
                Command::Date {
                    id: args.transaction(1)?,
                    date: args.parse(2, "date")?,
                },
                2,
            ),
            "save" => (Command::Save(args.transaction(1)?), 1),
            "cancel" => (Command::Cancel(args.transaction(1)?), 1),
            "delete" => (Command::Delete(args.transaction(1)?), 1),
            "sales" => (Command::Sales, 0),
            "ranking" => (Command::Ranking, 0),
            "help" | "?" => (Command::Help, 0),
            "quit" | "exit" => (Command::Quit, 0),
            _ => return Err(CommandError::Unknown(word.clone())),
        };

        if words.len() > arity + 1 {
            return Err(CommandError::TooManyArguments(command.name()));
        }

        Ok(command)
    }
}

impl Command {
    /// The word that invokes this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Products => "products",
            Command::Customers => "customers",
            Command::Add { .. } => "add",
            Command::Clear => "clear",
            Command::Cart => "cart",
            Command::Customer(_) => "customer",
            Command::Checkout => "checkout",
            Command::Transactions => "transactions",
            Command::Show(_) => "show",
            Command::Edit(_) => "edit",
            Command::Qty { .. } => "qty",
            Command::Who { .. } => "who",
            Command::Date { .. } => "date",
            Command::Save(_) => "save",
            Command::Cancel(_) => "cancel",
            Command::Delete(_) => "delete",
            Command::Sales => "sales",
            Command::Ranking => "ranking",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

struct Args<'w> {
    words: &'w [&'w str],
}

impl<'w> Args<'w> {
    fn word(&self, idx: usize) -> Option<&'w str> {
        self.words.get(idx).copied()
    }

    fn required(&self, idx: usize, name: &'static str) -> Result<&'w str, CommandError> {
        self.word(idx).ok_or(CommandError::MissingArgument(name))
    }

    fn parse<T: FromStr>(&self, idx: usize, name: &'static str) -> Result<T, CommandError> {
        let value = self.required(idx, name)?;

        value.parse().map_err(|_err| CommandError::InvalidArgument {
            name,
            value: value.to_string(),
        })
    }

    fn transaction(&self, idx: usize) -> Result<TransactionId, CommandError> {
        self.parse(idx, "transaction id")
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_commands_without_arguments() -> TestResult {
        assert_eq!("products".parse::<Command>()?, Command::Products);
        assert_eq!("  CART ".parse::<Command>()?, Command::Cart);
        assert_eq!("exit".parse::<Command>()?, Command::Quit);

        Ok(())
    }

    #[test]
    fn add_takes_an_optional_quantity() -> TestResult {
        assert_eq!(
            "add 2".parse::<Command>()?,
            Command::Add {
                product: ProductId(2),
                quantity: None,
            }
        );

        assert_eq!(
            "add 2 abc".parse::<Command>()?,
            Command::Add {
                product: ProductId(2),
                quantity: Some("abc".to_string()),
            }
        );

        Ok(())
    }

    #[test]
    fn qty_counts_lines_from_one() -> TestResult {
        assert_eq!(
            "qty 17 2 5".parse::<Command>()?,
            Command::Qty {
                id: TransactionId(17),
                line: 2,
                quantity: "5".to_string(),
            }
        );

        assert_eq!(
            "qty 17 0 5".parse::<Command>(),
            Err(CommandError::InvalidArgument {
                name: "line number",
                value: "0".to_string(),
            })
        );

        Ok(())
    }

    #[test]
    fn date_parses_civil_date_time() -> TestResult {
        assert_eq!(
            "date 17 2024-06-10T09:30".parse::<Command>()?,
            Command::Date {
                id: TransactionId(17),
                date: date(2024, 6, 10).at(9, 30, 0, 0),
            }
        );

        Ok(())
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "refund 1".parse::<Command>(),
            Err(CommandError::Unknown("refund".to_string()))
        );
        assert_eq!(
            "show".parse::<Command>(),
            Err(CommandError::MissingArgument("transaction id"))
        );
        assert_eq!(
            "customer ada".parse::<Command>(),
            Err(CommandError::InvalidArgument {
                name: "customer id",
                value: "ada".to_string(),
            })
        );
        assert_eq!(
            "checkout now".parse::<Command>(),
            Err(CommandError::TooManyArguments("checkout"))
        );
    }
}
