#![allow(dead_code)]

use insider_flow::columns::*;

/// One disclosure line; the defaults describe an in-scope promoter market buy.
#[derive(Clone)]
pub struct Disclosure {
    pub symbol: &'static str,
    pub company: &'static str,
    pub regulation: &'static str,
    pub category: &'static str,
    pub security_prior: &'static str,
    pub shares: &'static str,
    pub value: &'static str,
    pub transaction_type: &'static str,
    pub prior_pct: &'static str,
    pub post_pct: &'static str,
    pub date_from: &'static str,
    pub mode: &'static str,
}

impl Default for Disclosure {
    fn default() -> Self {
        Self {
            symbol: "ACME",
            company: "Acme Ltd",
            regulation: "7(2)",
            category: "Promoters",
            security_prior: "Equity Shares",
            shares: "100",
            value: "1000",
            transaction_type: "Buy",
            prior_pct: "1.0",
            post_pct: "1.0",
            date_from: "01-Jan-2024",
            mode: "Market Purchase",
        }
    }
}

impl Disclosure {
    fn cells(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .map(|column| {
                let cell = match *column {
                    SYMBOL => self.symbol,
                    COMPANY => self.company,
                    REGULATION => self.regulation,
                    CATEGORY_OF_PERSON => self.category,
                    SECURITY_TYPE_PRIOR => self.security_prior,
                    SECURITIES_ACQUIRED => self.shares,
                    VALUE_ACQUIRED => self.value,
                    TRANSACTION_TYPE => self.transaction_type,
                    SHAREHOLDING_PRIOR => self.prior_pct,
                    SHAREHOLDING_POST => self.post_pct,
                    ACQUISITION_FROM => self.date_from,
                    ACQUISITION_TO => self.date_from,
                    MODE_OF_ACQUISITION => self.mode,
                    ACQUIRER_NAME => "A Promoter",
                    EXCHANGE => "NSE",
                    SECURITY_TYPE_ACQUIRED | SECURITY_TYPE_POST => "Equity Shares",
                    _ => "-",
                };
                cell.to_string()
            })
            .collect()
    }
}

/// CSV text with the canonical header followed by `extra_headers`, padded with empty cells.
pub fn csv_with_extras(rows: &[Disclosure], extra_headers: &[&str]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let header: Vec<&str> = REQUIRED_COLUMNS.iter().chain(extra_headers).copied().collect();
    writer.write_record(&header).unwrap();
    for row in rows {
        let mut cells = row.cells();
        cells.extend(extra_headers.iter().map(|_| String::new()));
        writer.write_record(&cells).unwrap();
    }
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

pub fn csv(rows: &[Disclosure]) -> String {
    csv_with_extras(rows, &[])
}

/// Five in-scope rows over three companies plus one row for each filter stage to reject.
pub fn sample_rows() -> Vec<Disclosure> {
    vec![
        Disclosure {
            category: " PROMOTERS ",
            mode: "MARKET PURCHASE",
            security_prior: "EQUITY SHARES",
            shares: "1000",
            value: "6000000",
            prior_pct: "10.0",
            post_pct: "10.5",
            date_from: "01-Jan-2024",
            ..Default::default()
        },
        Disclosure {
            category: "Promoter Group",
            transaction_type: "buy",
            mode: "market purchase",
            security_prior: "equity shares",
            shares: "500",
            value: "4000000",
            prior_pct: "10.5",
            post_pct: "10.75",
            date_from: "05-Jan-2024",
            ..Default::default()
        },
        Disclosure {
            category: "promoters",
            transaction_type: "Sell",
            mode: "Market Sale",
            shares: "200",
            value: "1000000",
            prior_pct: "10.75",
            post_pct: "10.7",
            date_from: "07-Jan-2024",
            ..Default::default()
        },
        Disclosure {
            symbol: "BETA",
            company: "Beta Corp",
            shares: "100",
            value: "8999999.99",
            prior_pct: "1",
            post_pct: "1.25",
            ..Default::default()
        },
        Disclosure {
            symbol: "GAMMA",
            company: "Gamma Industries",
            shares: "300",
            value: "9000000",
            prior_pct: "2",
            post_pct: "2.5",
            ..Default::default()
        },
        Disclosure {
            regulation: "7(3)",
            value: "50000000",
            ..Default::default()
        },
        Disclosure {
            category: "Director",
            value: "50000000",
            ..Default::default()
        },
        Disclosure {
            transaction_type: "Pledge",
            value: "50000000",
            ..Default::default()
        },
        Disclosure {
            mode: "Off Market",
            value: "50000000",
            ..Default::default()
        },
        Disclosure {
            security_prior: "Warrants",
            value: "50000000",
            ..Default::default()
        },
    ]
}
