//! Lease liability amortization (effective interest, monthly accrual)

use chrono::NaiveDate;

use super::rows::{month_date, month_label, AmortizationRow};
use crate::contract::PaymentFrequency;
use crate::error::{LeaseError, LeaseResult};
use crate::valuation::LeaseDiscount;

/// Cash payment falling in month `month_index` of the lease
///
/// Monthly leases reuse the last payment once the list runs out. Quarterly
/// and yearly leases pay only on the first month of each period, and only
/// while the period index is within the list.
pub fn payment_for_month(payments: &[f64], frequency: PaymentFrequency, month_index: usize) -> f64 {
    match frequency {
        PaymentFrequency::Monthly => payments
            .get(month_index)
            .or_else(|| payments.last())
            .copied()
            .unwrap_or(0.0),
        PaymentFrequency::Quarterly | PaymentFrequency::Yearly => {
            let span = frequency.months_per_period();
            if month_index % span == 0 {
                payments.get(month_index / span).copied().unwrap_or(0.0)
            } else {
                0.0
            }
        }
    }
}

/// Roll the opening liability forward month by month
///
/// The carried balance is never rounded. It is floored at zero, and the
/// final month is forced to exactly zero to absorb residual drift.
pub fn amortize_liability(
    opening_liability: f64,
    payments: &[f64],
    frequency: PaymentFrequency,
    annual_rate_percent: f64,
    num_months: usize,
    start_date: NaiveDate,
) -> LeaseResult<Vec<AmortizationRow>> {
    if num_months == 0 {
        return Err(LeaseError::DegenerateTerm(
            "liability schedule needs at least one month".to_string(),
        ));
    }
    if payments.is_empty() {
        return Err(LeaseError::DegenerateTerm(
            "liability schedule needs at least one payment".to_string(),
        ));
    }

    let monthly_rate = LeaseDiscount::from_percent(annual_rate_percent, frequency).monthly_rate();
    let last_index = num_months - 1;

    let mut remaining = opening_liability;
    let mut rows = Vec::with_capacity(num_months);

    for month_index in 0..num_months {
        let interest_expense = remaining * monthly_rate;
        let payment = payment_for_month(payments, frequency, month_index);

        let mut next = remaining + interest_expense - payment;
        if month_index == last_index {
            next = 0.0;
        }
        remaining = next.max(0.0);

        rows.push(AmortizationRow {
            month_index,
            month: month_label(month_date(start_date, month_index)?),
            payment,
            interest_expense,
            remaining_liability: remaining,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::present_value;
    use approx::assert_relative_eq;

    fn jan_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_monthly_three_month_lease() {
        let payments = [1000.0; 3];
        let pv = present_value(&payments, PaymentFrequency::Monthly, 12.0).unwrap();
        let rows = amortize_liability(pv, &payments, PaymentFrequency::Monthly, 12.0, 3, jan_2024()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].month, "Jan-24");
        assert_eq!(rows[2].month, "Mar-24");

        assert_relative_eq!(rows[0].interest_expense, pv * 0.01, epsilon = 1e-9);
        assert_relative_eq!(rows[0].remaining_liability, pv * 1.01 - 1000.0, epsilon = 1e-9);
        assert_eq!(rows[2].remaining_liability, 0.0);
        assert!(rows.iter().all(|r| r.payment == 1000.0));
    }

    #[test]
    fn test_yearly_pays_on_anniversaries_only() {
        let payments = [10000.0, 10000.0];
        let pv = present_value(&payments, PaymentFrequency::Yearly, 6.0).unwrap();
        let rows = amortize_liability(pv, &payments, PaymentFrequency::Yearly, 6.0, 24, jan_2024()).unwrap();

        assert_eq!(rows.len(), 24);
        for row in &rows {
            if row.month_index == 0 || row.month_index == 12 {
                assert_eq!(row.payment, 10000.0);
            } else {
                assert_eq!(row.payment, 0.0);
            }
        }

        // Interest accrues every month at rate / 12 on the opening balance
        assert_relative_eq!(rows[0].interest_expense, pv * 0.005, epsilon = 1e-9);
        assert_relative_eq!(
            rows[1].interest_expense,
            rows[0].remaining_liability * 0.005,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            rows[1].remaining_liability,
            rows[0].remaining_liability * 1.005,
            epsilon = 1e-9
        );
        assert_eq!(rows[23].remaining_liability, 0.0);
    }

    #[test]
    fn test_quarterly_pays_first_month_of_each_quarter() {
        let payments = [300.0, 310.0, 320.0];
        let rows = amortize_liability(900.0, &payments, PaymentFrequency::Quarterly, 4.0, 9, jan_2024()).unwrap();
        let paid: Vec<f64> = rows.iter().map(|r| r.payment).collect();
        assert_eq!(paid, vec![300.0, 0.0, 0.0, 310.0, 0.0, 0.0, 320.0, 0.0, 0.0]);
    }

    #[test]
    fn test_quarterly_partial_final_quarter() {
        // 13 months round up to 5 quarters; the 5th payment falls in month 12
        let payments = [100.0; 5];
        let rows = amortize_liability(450.0, &payments, PaymentFrequency::Quarterly, 0.0, 13, jan_2024()).unwrap();
        assert_eq!(rows[12].payment, 100.0);
        assert_eq!(rows[12].remaining_liability, 0.0);
    }

    #[test]
    fn test_short_monthly_list_repeats_last_payment() {
        let rows = amortize_liability(1000.0, &[400.0, 250.0], PaymentFrequency::Monthly, 0.0, 4, jan_2024()).unwrap();
        let paid: Vec<f64> = rows.iter().map(|r| r.payment).collect();
        assert_eq!(paid, vec![400.0, 250.0, 250.0, 250.0]);
    }

    #[test]
    fn test_short_yearly_list_stops_paying() {
        let rows = amortize_liability(5000.0, &[5000.0], PaymentFrequency::Yearly, 5.0, 24, jan_2024()).unwrap();
        assert_eq!(rows[0].payment, 5000.0);
        assert_eq!(rows[12].payment, 0.0);
    }

    #[test]
    fn test_overpayment_is_floored_at_zero() {
        let rows = amortize_liability(500.0, &[2000.0, 10.0, 10.0], PaymentFrequency::Monthly, 12.0, 3, jan_2024()).unwrap();
        assert_eq!(rows[0].remaining_liability, 0.0);
        assert!(rows.iter().all(|r| r.remaining_liability >= 0.0));
        // Interest after the floor accrues on zero
        assert_eq!(rows[1].interest_expense, 0.0);
    }

    #[test]
    fn test_balance_never_negative_and_ends_at_zero() {
        for frequency in [PaymentFrequency::Monthly, PaymentFrequency::Quarterly, PaymentFrequency::Yearly] {
            let periods = match frequency {
                PaymentFrequency::Monthly => 60,
                PaymentFrequency::Quarterly => 20,
                PaymentFrequency::Yearly => 5,
            };
            let payments = vec![1200.0; periods];
            let pv = present_value(&payments, frequency, 9.0).unwrap();
            let rows = amortize_liability(pv, &payments, frequency, 9.0, 60, jan_2024()).unwrap();
            assert!(rows.iter().all(|r| r.remaining_liability >= 0.0));
            assert_eq!(rows.last().unwrap().remaining_liability, 0.0);
        }
    }

    #[test]
    fn test_single_month_lease() {
        let rows = amortize_liability(750.0, &[750.0], PaymentFrequency::Monthly, 10.0, 1, jan_2024()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].payment, 750.0);
        assert_eq!(rows[0].remaining_liability, 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let err = amortize_liability(100.0, &[100.0], PaymentFrequency::Monthly, 5.0, 0, jan_2024()).unwrap_err();
        assert!(err.is_degenerate_term());

        let err = amortize_liability(100.0, &[], PaymentFrequency::Monthly, 5.0, 3, jan_2024()).unwrap_err();
        assert!(err.is_degenerate_term());
    }

    #[test]
    fn test_recompute_is_identical() {
        let payments = [950.0, 975.0, 1000.0, 1025.0];
        let first = amortize_liability(3800.0, &payments, PaymentFrequency::Quarterly, 7.0, 12, jan_2024()).unwrap();
        let second = amortize_liability(3800.0, &payments, PaymentFrequency::Quarterly, 7.0, 12, jan_2024()).unwrap();
        assert_eq!(first, second);
    }
}
