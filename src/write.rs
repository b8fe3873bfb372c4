use crate::data::{Error, ReportRow};

/// Rows must be in strictly ascending date order, which also rules out
/// duplicate dates. They are never re-sorted.
pub(crate) fn check_order(rows: &[ReportRow]) -> Result<(), Error> {
    match rows.windows(2).find(|pair| pair[0].date >= pair[1].date) {
        Some(pair) => Err(Error::UnorderedTable(pair[1].date)),
        None => Ok(()),
    }
}

/// Basic CSV exporter for the report.
pub(crate) fn write_report<W: std::io::Write>(
    writer: W,
    rows: &[ReportRow],
) -> Result<(), anyhow::Error> {
    check_order(rows)?;
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        data::{Error, ReportRow},
        read::read_report,
        write::write_report,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn row(day: u32, projected: Decimal) -> ReportRow {
        ReportRow {
            date: NaiveDate::from_ymd_opt(2025, 3, 19 + day).unwrap(),
            day,
            remaining_days: 2 - day,
            increment_percent: dec!(0.0051),
            increment_value: (day > 0).then_some(dec!(6376.8411)),
            projected_balance: projected,
            actual_balance: None,
            difference: None,
            difference_percent: None,
        }
    }

    #[test]
    fn write_rows() {
        let mut second = row(1, dec!(1256737.8411));
        second.record_actual(dec!(1260000));
        let mut out = Vec::new();
        write_report(&mut out, &[row(0, dec!(1250361)), second]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
date,day,remaining_days,increment_percent,increment_value,projected_balance,actual_balance,difference,difference_percent
2025-03-19,0,2,0.0051,-,1_250_361.00,-,-,-
2025-03-20,1,1,0.0051,6_376.84,1_256_737.84,1_260_000.00,3_262.16,0.26%
"
        );
    }

    #[test]
    fn written_rows_read_back_rounded() {
        let mut out = Vec::new();
        write_report(&mut out, &[row(0, dec!(1250361)), row(1, dec!(1256737.8411))]).unwrap();
        let rows = read_report(&out[..]).unwrap();
        assert_eq!(rows[1].increment_value, Some(dec!(6376.84)));
        assert_eq!(rows[1].projected_balance, dec!(1256737.84));
    }

    #[test]
    fn unordered_rows_are_rejected() {
        let mut out = Vec::new();
        let err = write_report(&mut out, &[row(1, dec!(1)), row(0, dec!(1))]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::UnorderedTable(
                NaiveDate::from_ymd_opt(2025, 3, 19).unwrap()
            ))
        );
        assert!(out.is_empty());
    }
}
