use crate::infra::{load_accounts, load_transactions, InMemoryCheckRepository};
use chrono::{Datelike, Local, Months, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tenant_affordability::config::AppConfig;
use tenant_affordability::error::AppError;
use tenant_affordability::workflows::affordability::composite::score_from_report;
use tenant_affordability::workflows::affordability::{
    Account, AffordabilityEngine, AffordabilityReport, ReportBreakdown, Transaction,
};
use tenant_affordability::workflows::checks::router::parse_evaluation_date;
use tenant_affordability::workflows::checks::AffordabilityCheckService;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Transaction export (CSV, or a JSON array when the file ends in .json)
    #[arg(long)]
    pub(crate) transactions: PathBuf,
    /// Optional JSON array of account balances
    #[arg(long)]
    pub(crate) accounts: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_evaluation_date)]
    pub(crate) now: Option<NaiveDate>,
    /// Print the report as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_evaluation_date)]
    pub(crate) now: Option<NaiveDate>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        transactions,
        accounts,
        now,
        json,
    } = args;

    let config = AppConfig::load()?;
    let engine = AffordabilityEngine::new(config.scoring);
    let now = now.unwrap_or_else(|| Local::now().date_naive());

    let transactions = load_transactions(&transactions)?;
    let accounts = match accounts {
        Some(path) => load_accounts(&path)?,
        None => Vec::new(),
    };

    if json {
        let report = engine.compute(&transactions, &accounts, now);
        println!("{}", to_pretty_json(&report)?);
        return Ok(());
    }

    let breakdown = engine.assess(&transactions, &accounts, now);
    render_breakdown(&breakdown, now);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(|| Local::now().date_naive());
    let (transactions, accounts) = synthetic_applicant(now);

    let engine = Arc::new(AffordabilityEngine::default());
    let service = AffordabilityCheckService::new(
        Arc::new(InMemoryCheckRepository::default()),
        engine.clone(),
    );

    println!("Tenant affordability demo");
    let opened = service.open("Demo Applicant")?;
    println!(
        "- Opened check {} for {} ({})",
        opened.check_id,
        opened.applicant_name,
        opened.status
    );
    let started = service.begin(&opened.check_id)?;
    println!("- Bank data collection {}", started.status);
    println!(
        "- Scoring {} transactions across {} account(s)",
        transactions.len(),
        accounts.len()
    );

    let completed = service.complete(&opened.check_id, &transactions, &accounts, now)?;
    println!("- Check {} on {}", completed.status, now);

    render_breakdown(&engine.assess(&transactions, &accounts, now), now);

    if let Some(report) = completed.report.as_ref() {
        println!(
            "\nComposite disposable-income score: {:.2}/10",
            score_from_report(report)
        );
        println!("\nStored report payload:\n{}", to_pretty_json(report)?);
    }

    Ok(())
}

fn render_breakdown(breakdown: &ReportBreakdown, now: NaiveDate) {
    let report = &breakdown.report;
    println!("\nAffordability report as of {}", now);
    println!(
        "- Income stability: {:.2}/100 over {} income event(s)",
        report.income_stability_score, breakdown.income_transaction_count
    );
    if let (Some(first), Some(last)) = (breakdown.first_income_on, breakdown.last_income_on) {
        println!("  Income observed from {} to {}", first, last);
    }
    println!(
        "- Average monthly income: {:.2}",
        report.average_monthly_income
    );
    println!("- Enhanced DTI: {:.2}%", report.enhanced_dti_ratio);
    println!(
        "- Behavioral savings rate: {:.2}%",
        report.behavioral_savings_rate
    );
    println!(
        "- Financial cushion: {:.2} months (burn {:.2}/month, buffer {:.2})",
        report.financial_cushion_months,
        breakdown.cushion.monthly_burn_rate,
        breakdown.cushion.baseline_buffer
    );

    render_flags(report);
}

fn render_flags(report: &AffordabilityReport) {
    if report.flags.is_empty() {
        println!("\nFlags: none");
        return;
    }

    println!("\nFlags");
    for flag in &report.flags {
        println!(
            "- [{:?}/{:?}] {}: {}",
            flag.category,
            flag.severity,
            flag.flag_type.code(),
            flag.description
        );
        for evidence in &flag.evidence {
            println!(
                "    {} {:>10.2} {}",
                evidence.date, evidence.amount, evidence.description
            );
        }
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|err| {
        AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, err))
    })
}

/// Six months of salary, rent, groceries and savings ending the month before `now`, plus a
/// single payday loan repayment.
fn synthetic_applicant(now: NaiveDate) -> (Vec<Transaction>, Vec<Account>) {
    let month_starts: Vec<NaiveDate> = (1..=6)
        .rev()
        .filter_map(|offset| {
            now.with_day(1)
                .and_then(|start| start.checked_sub_months(Months::new(offset)))
        })
        .collect();

    let mut transactions = Vec::new();
    for (index, start) in month_starts.iter().enumerate() {
        let on = |day: u32| start.with_day(day).unwrap_or(*start);
        let salary = 3200.0 + (index % 2) as f64 * 15.0;
        transactions.push(Transaction::new(on(1), "Salariu ACME SRL", salary).on_account("ro-main"));
        transactions.push(Transaction::new(on(2), "Move to vault", -450.0).on_account("ro-main"));
        transactions.push(Transaction::new(on(4), "Monthly rent", -1100.0).on_account("ro-main"));
        transactions.push(
            Transaction::new(on(9), "Kaufland groceries", -310.0).on_account("ro-main"),
        );
        transactions.push(Transaction::new(on(15), "Enel energie", -95.0).on_account("ro-main"));
        transactions.push(Transaction::new(on(18), "Car loan", -420.0).on_account("ro-main"));
    }
    if let Some(last) = month_starts.last() {
        let repaid_on = last.with_day(21).unwrap_or(*last);
        transactions.push(
            Transaction::new(repaid_on, "Provident Financial", -120.0).on_account("ro-main"),
        );
    }

    let accounts = vec![
        Account::new("ro-main", 2400.0),
        Account::new("ro-savings", 5200.0),
    ];
    (transactions, accounts)
}
