//! Transaction loaders for CSV and JSON files
//!
//! CSV headers are matched case-insensitively against common bank export
//! names ("Transaction Date", "Posted Date", "Memo", "Payee", ...). Amounts
//! come either from a single signed column or from split Debit/Credit
//! columns. A cell that fails to parse leaves the field empty instead of
//! failing the load, so the matcher can report the record as skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Transaction;

const DATE_HEADERS: &[&str] = &[
    "date",
    "transaction date",
    "trans. date",
    "posted date",
    "post date",
    "posting date",
];
const DESCRIPTION_HEADERS: &[&str] = &["description", "memo", "payee", "merchant", "name"];
const AMOUNT_HEADERS: &[&str] = &["amount", "transaction amount"];
const DEBIT_HEADERS: &[&str] = &["debit", "withdrawal", "withdrawals"];
const CREDIT_HEADERS: &[&str] = &["credit", "deposit", "deposits"];
const CATEGORY_HEADERS: &[&str] = &["category"];
const ACCOUNT_HEADERS: &[&str] = &["account", "account_id", "account id", "account name"];

/// Column positions resolved from a CSV header row
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnMap {
    date: usize,
    description: usize,
    amount: AmountColumns,
    category: Option<usize>,
    account: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AmountColumns {
    Signed(usize),
    Split {
        debit: Option<usize>,
        credit: Option<usize>,
    },
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
        };

        let date = find(DATE_HEADERS)
            .ok_or_else(|| Error::Import("Missing date column in CSV header".into()))?;
        let description = find(DESCRIPTION_HEADERS)
            .ok_or_else(|| Error::Import("Missing description column in CSV header".into()))?;

        let amount = match find(AMOUNT_HEADERS) {
            Some(col) => AmountColumns::Signed(col),
            None => {
                let debit = find(DEBIT_HEADERS);
                let credit = find(CREDIT_HEADERS);
                if debit.is_none() && credit.is_none() {
                    return Err(Error::Import(
                        "Missing amount (or debit/credit) column in CSV header".into(),
                    ));
                }
                AmountColumns::Split { debit, credit }
            }
        };

        Ok(Self {
            date,
            description,
            amount,
            category: find(CATEGORY_HEADERS),
            account: find(ACCOUNT_HEADERS),
        })
    }
}

/// Parse CSV data into transactions
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;
    debug!("CSV columns resolved: {:?}", columns);

    let mut transactions = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let date = cell(&record, Some(columns.date)).and_then(|s| {
            let parsed = parse_date(s);
            if parsed.is_none() {
                debug!("Row {}: unable to parse date '{}'", row + 1, s);
            }
            parsed
        });

        let description = cell(&record, Some(columns.description))
            .unwrap_or_default()
            .to_string();

        let amount = match columns.amount {
            AmountColumns::Signed(col) => cell(&record, Some(col)).and_then(parse_amount),
            AmountColumns::Split { debit, credit } => {
                match (cell(&record, debit), cell(&record, credit)) {
                    // Debits are expenses (negative)
                    (Some(d), _) => parse_amount(d).map(|v| -v.abs()),
                    // Credits are income (positive)
                    (None, Some(c)) => parse_amount(c).map(f64::abs),
                    (None, None) => None,
                }
            }
        };
        if amount.is_none() {
            debug!("Row {}: no usable amount", row + 1);
        }

        transactions.push(Transaction {
            date,
            description,
            amount,
            category: cell(&record, columns.category).map(str::to_string),
            account_id: cell(&record, columns.account).map(str::to_string),
        });
    }

    debug!("Parsed {} CSV transactions", transactions.len());
    Ok(transactions)
}

/// Parse a JSON array of transactions
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> = serde_json::from_reader(reader)?;
    debug!("Parsed {} JSON transactions", transactions.len());
    Ok(transactions)
}

/// Load transactions from a file, choosing the parser by extension
pub fn load_file(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        parse_json(file)
    } else {
        parse_csv(file)
    }
}

/// Non-empty cell at an optional column
fn cell(record: &StringRecord, col: Option<usize>) -> Option<&str> {
    col.and_then(|c| record.get(c)).filter(|s| !s.is_empty())
}

/// Parse a date string in various common formats.
///
/// Datetimes keep only their date part.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // "2024-01-15T10:30:00Z" / "2024-01-15 10:30"
    let s = s.split(['T', ' ']).next().unwrap_or(s);

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%y", // 01/15/24
        "%m/%d/%Y", // 01/15/2024
        "%m-%d-%Y", // 01-15-2024
        "%d/%m/%Y", // 15/01/2024 (European)
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse an amount string, handling currency symbols and commas
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
