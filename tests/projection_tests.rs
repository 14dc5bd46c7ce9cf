use hearth_ledger::domain::{FieldCatalog, OwnerId, Period, PredictionRecord};
use hearth_ledger::projection::{
    complete_year, cumulative_saving_at_month, ensure_field_completeness, month_totals,
    totals_for_month, yearly_totals, YEAR_END_MONTH,
};

fn owner() -> OwnerId {
    OwnerId::new("family")
}

fn empty_year(year: i32) -> Vec<PredictionRecord> {
    (1..=12)
        .map(|month| PredictionRecord::new(owner(), Period::new(year, month).unwrap()))
        .collect()
}

fn planned_year() -> Vec<PredictionRecord> {
    (1..=12)
        .map(|month| {
            PredictionRecord::new(owner(), Period::new(2025, month).unwrap())
                .with_income("mumsSalary", 30000.0)
                .with_income("dadsTransfer", 5000.0 + month as f64 * 100.0)
                .with_expense("home", 12000.0)
                .with_expense("groceries", 8000.0 + (month % 3) as f64 * 750.0)
                .with_expense("tuition", if month == 6 { 25000.0 } else { 0.0 })
        })
        .collect()
}

#[test]
fn empty_year_worked_example() {
    let records = empty_year(2025);
    for month in 1..=12 {
        assert_eq!(cumulative_saving_at_month(&records, month, 1000.0), 1000.0);
    }
    assert_eq!(yearly_totals(&records, 1000.0).projected_saving, 1000.0);
}

#[test]
fn first_month_has_no_prior_balance() {
    let records = planned_year();
    for saving in [0.0, 1000.0, -250.0, 123456.78] {
        assert_eq!(cumulative_saving_at_month(&records, 1, saving), saving);
    }
}

#[test]
fn cumulative_saving_recurrence_holds() {
    let records = planned_year();
    for month in 2..=YEAR_END_MONTH {
        let previous = cumulative_saving_at_month(&records, month - 1, 5000.0);
        let balance = month_totals(&records[(month - 2) as usize]).balance;
        assert_eq!(
            cumulative_saving_at_month(&records, month, 5000.0),
            previous + balance,
            "month {month}"
        );
    }
}

#[test]
fn projected_saving_is_month_thirteen() {
    let records = planned_year();
    let totals = yearly_totals(&records, 5000.0);
    assert_eq!(
        totals.projected_saving,
        cumulative_saving_at_month(&records, 13, 5000.0)
    );
    let income: f64 = (1..=12).map(|m| totals_for_month(&records, m).income_total).sum();
    assert!((totals.total_income - income).abs() < 1e-6);
    assert!((totals.balance - (totals.total_income - totals.total_expense)).abs() < 1e-6);
}

#[test]
fn field_completion_is_idempotent() {
    let mut records = planned_year();
    records[3].income.set("rentalincome", 4000.0);
    let catalog = FieldCatalog::discover(
        &records,
        &FieldCatalog::household().baseline_income,
        &FieldCatalog::household().baseline_expense,
    );
    let income: Vec<&str> = catalog.income_keys().collect();
    let expense: Vec<&str> = catalog.expense_keys().collect();

    ensure_field_completeness(&mut records, &income, &expense);
    let once = records.clone();
    ensure_field_completeness(&mut records, &income, &expense);
    assert_eq!(records, once);
    assert!(records.iter().all(|r| r.income.contains("rentalincome")));
    assert_eq!(records[3].income.get("rentalincome"), 4000.0);
    assert_eq!(records[0].income.get("rentalincome"), 0.0);
}

#[test]
fn completing_a_sparse_year_does_not_change_totals() {
    let sparse = vec![
        PredictionRecord::new(owner(), Period::new(2025, 2).unwrap())
            .with_income("mumsSalary", 1000.0),
        PredictionRecord::new(owner(), Period::new(2025, 11).unwrap())
            .with_expense("electricity", 300.0),
    ];
    let before = yearly_totals(&sparse, 50.0);
    let plan = complete_year(&owner(), 2025, sparse, &FieldCatalog::household()).unwrap();
    assert_eq!(plan.months().len(), 12);
    assert_eq!(plan.totals(50.0), before);
    assert_eq!(plan.cumulative_saving_at(11, 50.0), 1050.0);
    assert_eq!(plan.cumulative_saving_at(12, 50.0), 750.0);
    assert_eq!(plan.cumulative_saving_at(13, 50.0), 750.0);
}
