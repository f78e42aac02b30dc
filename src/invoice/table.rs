use std::str::FromStr;

use bigdecimal::BigDecimal;

/// Header of the downloadable artifact.
pub const CSV_HEADER: &str = "Item Number,Item Name,Item Price,Total Tax amount,Total Price";
pub const CSV_FILE_NAME: &str = "extracted_items.csv";
/// Item name of the aggregate row.
pub const TOTAL_MARKER: &str = "Total";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse a plain decimal amount: optional sign, digits, optional fraction.
///
/// Exponents are rejected before `BigDecimal` sees the text; a scale like
/// `1e900000000` would otherwise be materialized digit by digit.
pub fn parse_amount(text: &str) -> Option<BigDecimal> {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(int) || !frac.map_or(true, digits) {
        return None;
    }
    BigDecimal::from_str(text).ok()
}

/// One row of the table. Numeric fields keep the model's decimal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub number: String,
    pub name: String,
    pub price: String,
    pub tax: String,
    pub total: String,
}

impl LineRecord {
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
        tax: impl Into<String>,
        total: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            price: price.into(),
            tax: tax.into(),
            total: total.into(),
        }
    }

    pub fn aggregate(
        price: impl Into<String>,
        tax: impl Into<String>,
        total: impl Into<String>,
    ) -> Self {
        Self::new("", TOTAL_MARKER, price, tax, total)
    }

    pub fn is_aggregate(&self) -> bool {
        self.number.is_empty() && self.name == TOTAL_MARKER
    }

    fn fields(&self) -> [&str; 5] {
        [
            self.number.as_str(),
            self.name.as_str(),
            self.price.as_str(),
            self.tax.as_str(),
            self.total.as_str(),
        ]
    }
}

/// Line items plus the trailing aggregate row, in model order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTable {
    lines: Vec<LineRecord>,
    aggregate: LineRecord,
}

impl ItemTable {
    pub fn new(lines: Vec<LineRecord>, aggregate: LineRecord) -> Self {
        Self { lines, aggregate }
    }

    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    pub fn aggregate(&self) -> &LineRecord {
        &self.aggregate
    }

    /// All rows as they appear in the artifact.
    pub fn rows(&self) -> impl Iterator<Item = &LineRecord> {
        self.lines.iter().chain(std::iter::once(&self.aggregate))
    }

    pub fn row_count(&self) -> usize {
        self.lines.len() + 1
    }

    /// Canonical CSV bytes: UTF-8 with BOM so spreadsheet apps pick the
    /// right encoding, `\n` line endings, quoting only where needed.
    pub fn to_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(UTF8_BOM.to_vec());
        wtr.write_record(CSV_HEADER.split(','))?;
        for row in self.rows() {
            wtr.write_record(row.fields())?;
        }
        wtr.into_inner()
            .map_err(|err| csv::Error::from(err.into_error()))
    }

    /// Column sums of the line items: price, tax, total.
    pub fn computed_totals(&self) -> Option<[BigDecimal; 3]> {
        let mut sums = [BigDecimal::from(0), BigDecimal::from(0), BigDecimal::from(0)];
        for line in &self.lines {
            for (sum, field) in sums.iter_mut().zip([&line.price, &line.tax, &line.total]) {
                *sum += parse_amount(field)?;
            }
        }
        Some(sums)
    }

    /// Compare the model's aggregate row against the locally computed sums.
    ///
    /// Returns `None` when the aggregate row holds non-decimal text.
    pub fn totals_consistent(&self) -> Option<bool> {
        let computed = self.computed_totals()?;
        let agg = &self.aggregate;
        let mut consistent = true;
        for (sum, field) in computed.iter().zip([&agg.price, &agg.tax, &agg.total]) {
            let reported = parse_amount(field)?;
            consistent &= reported == *sum;
        }
        Some(consistent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pen_table() -> ItemTable {
        ItemTable::new(
            vec![LineRecord::new("1", "Pen", "10", "0", "10")],
            LineRecord::aggregate("10", "0", "10"),
        )
    }

    #[test]
    fn csv_has_bom_header_and_aggregate() {
        let bytes = pen_table().to_csv().unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text,
            "Item Number,Item Name,Item Price,Total Tax amount,Total Price\n\
             1,Pen,10,0,10\n\
             ,Total,10,0,10\n"
        );
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let table = ItemTable::new(
            vec![LineRecord::new("1", "Paracetamol, 500mg", "50", "5", "55")],
            LineRecord::aggregate("50", "5", "55"),
        );
        let bytes = table.to_csv().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("1,\"Paracetamol, 500mg\",50,5,55\n"));
    }

    #[test]
    fn totals_cross_check() {
        assert_eq!(pen_table().totals_consistent(), Some(true));

        let off = ItemTable::new(
            vec![
                LineRecord::new("1", "Pen", "10.50", "0", "10.50"),
                LineRecord::new("2", "Ink", "4.5", "0.5", "5"),
            ],
            LineRecord::aggregate("15", "0.5", "16"),
        );
        assert_eq!(off.totals_consistent(), Some(false));

        let opaque = ItemTable::new(
            vec![LineRecord::new("1", "Pen", "10", "0", "10")],
            LineRecord::aggregate("", "0", "10"),
        );
        assert_eq!(opaque.totals_consistent(), None);
    }

    #[test]
    fn decimal_sums_do_not_drift() {
        let table = ItemTable::new(
            vec![
                LineRecord::new("1", "A", "0.1", "0", "0.1"),
                LineRecord::new("2", "B", "0.2", "0", "0.2"),
            ],
            LineRecord::aggregate("0.3", "0", "0.3"),
        );
        assert_eq!(table.totals_consistent(), Some(true));
    }

    #[test]
    fn amounts_must_be_plain_decimals() {
        assert_eq!(parse_amount("10.50"), BigDecimal::from_str("10.5").ok());
        assert!(parse_amount("-3").is_some());
        for bad in ["", "1e3", "1E3", "1e-900000000", ".5", "5.", "1.2.3", "1,000", "₹10", " 1"] {
            assert!(parse_amount(bad).is_none(), "{bad:?} accepted");
        }
    }

    #[test]
    fn exponent_in_aggregate_skips_cross_check() {
        let table = ItemTable::new(
            vec![LineRecord::new("1", "Pen", "10", "0", "10")],
            LineRecord::aggregate("1e900000000", "0", "1e-900000000"),
        );
        assert_eq!(table.totals_consistent(), None);
    }

    #[test]
    fn aggregate_detection() {
        assert!(LineRecord::aggregate("1", "0", "1").is_aggregate());
        assert!(!LineRecord::new("1", "Total", "1", "0", "1").is_aggregate());
    }
}
