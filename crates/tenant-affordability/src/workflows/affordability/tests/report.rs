use serde_json::json;

use super::common::*;
use crate::workflows::affordability::composite::score_from_report;
use crate::workflows::affordability::{
    Account, AffordabilityReport, Classification, FlagType, Transaction,
};

fn applicant_history() -> (Vec<Transaction>, Vec<Account>) {
    let mut transactions: Vec<Transaction> = monthly_salaries()
        .into_iter()
        .map(|salary| salary.on_account("acc-1"))
        .collect();
    transactions.extend([
        tx(2025, 3, 2, "Move to vault", -400.0).on_account("acc-1"),
        tx(2025, 4, 2, "Move to vault", -400.0).on_account("acc-1"),
        tx(2025, 5, 2, "Move to vault", -400.0).on_account("acc-1"),
        tx(2025, 4, 10, "Car loan", -300.0).on_account("acc-1"),
        tx(2025, 5, 10, "Car loan", -300.0).on_account("acc-1"),
        tx(2025, 6, 10, "Car loan", -300.0).on_account("acc-1"),
        tx(2025, 5, 20, "Provident Financial", -90.0).on_account("acc-1"),
    ]);
    (transactions, vec![Account::new("acc-1", 1500.0)])
}

#[test]
fn empty_input_yields_the_zero_report() {
    let report = engine().compute(&[], &[], now());

    assert_eq!(report, AffordabilityReport::empty());
    assert!(report.flags.is_empty());
}

#[test]
fn three_salaries_produce_stable_income() {
    let report = engine().compute(&monthly_salaries(), &[], now());

    assert_eq!(report.income_stability_score, 96.97);
    assert_eq!(report.average_monthly_income, SALARY_AVERAGE);
    assert_eq!(report.enhanced_dti_ratio, 0.0);
    assert_eq!(report.financial_cushion_months, 0.0);
}

#[test]
fn full_history_populates_every_metric() {
    let (transactions, accounts) = applicant_history();

    let breakdown = engine().assess(&transactions, &accounts, now());
    let report = &breakdown.report;

    assert_eq!(report.average_monthly_income, SALARY_AVERAGE);
    assert_eq!(report.enhanced_dti_ratio, 11.02);
    assert_eq!(report.behavioral_savings_rate, 13.34);
    assert_eq!(
        report
            .flags
            .iter()
            .map(|flag| flag.flag_type)
            .collect::<Vec<_>>(),
        vec![FlagType::ConsistentSavings, FlagType::PaydayLoanUsage]
    );
    assert_eq!(report.red_flags().count(), 1);
    assert_eq!(breakdown.income_transaction_count, 3);
    assert_eq!(breakdown.first_income_on, Some(date(2025, 3, 1)));
    assert_eq!(breakdown.last_income_on, Some(date(2025, 5, 1)));

    for value in [
        report.income_stability_score,
        report.average_monthly_income,
        report.enhanced_dti_ratio,
        report.behavioral_savings_rate,
        report.financial_cushion_months,
    ] {
        assert_two_decimals(value);
    }
}

#[test]
fn same_input_serializes_identically() {
    let (transactions, accounts) = applicant_history();
    let engine = engine();

    let first = serde_json::to_vec(&engine.compute(&transactions, &accounts, now()))
        .expect("report serializes");
    let second = serde_json::to_vec(&engine.compute(&transactions, &accounts, now()))
        .expect("report serializes");

    assert_eq!(first, second);
}

#[test]
fn report_uses_camel_case_wire_names() {
    let (transactions, accounts) = applicant_history();

    let value = serde_json::to_value(engine().compute(&transactions, &accounts, now()))
        .expect("report serializes");

    for key in [
        "incomeStabilityScore",
        "averageMonthlyIncome",
        "enhancedDtiRatio",
        "behavioralSavingsRate",
        "financialCushionMonths",
        "flags",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    let payday = &value["flags"][1];
    assert_eq!(payday["type"], "PAYDAY_LOAN_USAGE");
    assert_eq!(payday["severity"], "High");
    assert_eq!(payday["category"], "red");
    assert_eq!(payday["evidence"][0]["date"], "2025-05-20");
    assert_eq!(payday["evidence"][0]["amount"], -90.0);
}

#[test]
fn provider_payloads_with_scaled_amounts_are_scored() {
    let payload = json!([
        { "made_on": "2025-03-01", "description": "Salariu martie",
          "amount": { "value": { "unscaledValue": "200000", "scale": 2 } }, "account_id": 77 },
        { "made_on": "2025-04-01", "description": "Salariu aprilie",
          "amount": { "unscaledValue": 200000, "scale": "2" }, "account_id": 77 },
        { "made_on": "2025-05-01", "description": "Salariu mai",
          "amount": "2000.00", "account_id": 77 },
        { "made_on": "2025-05-03", "description": null, "amount": { "value": "n/a" } }
    ]);
    let transactions: Vec<Transaction> =
        serde_json::from_value(payload).expect("payload deserializes");
    let accounts: Vec<Account> =
        serde_json::from_value(json!([{ "id": 77, "balance": "950.10" }]))
            .expect("accounts deserialize");

    assert_eq!(transactions[3].amount, 0.0);
    assert_eq!(transactions[3].description, "");
    assert_eq!(accounts[0].id, "77");

    let report = engine().compute(&transactions, &accounts, now());
    assert_eq!(report.average_monthly_income, SALARY_AVERAGE);
    assert_eq!(report.income_stability_score, 96.97);
}

#[test]
fn classify_tags_without_affecting_scores() {
    let (transactions, _) = applicant_history();

    let tagged = engine().classify(&transactions);

    assert_eq!(tagged.len(), transactions.len());
    assert_eq!(tagged[0].classification, Classification::Income);
    assert_eq!(tagged[3].classification, Classification::Unclassified);
    assert_eq!(tagged[6].classification, Classification::Debt);
}

#[test]
fn composite_score_reflects_debt_load() {
    let (transactions, accounts) = applicant_history();
    let report = engine().compute(&transactions, &accounts, now());

    let score = score_from_report(&report);

    assert_eq!(score, 8.9);
    assert_eq!(score_from_report(&AffordabilityReport::empty()), 0.0);
}
