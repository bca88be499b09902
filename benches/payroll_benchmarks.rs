//! Performance benchmarks for the Payroll Computation Engine.
//!
//! - A half-month of attendance through the calculation stages
//! - A full finalize request through the HTTP router
//! - A batch of 100 employees through `finalize_batch`
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{aggregate_attendance, compute_deductions, compute_pay};
use payroll_engine::config::ConfigLoader;
use payroll_engine::engine::{FinalizeRequest, PayrollEngine};
use payroll_engine::ledger::InMemoryPayslipStore;
use payroll_engine::models::{
    AttendanceRecord, Compensation, Employee, HalfPeriod, Money, PayAdjustments, PayPeriod,
};

use axum::{body::Body, http::Request};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tower::ServiceExt;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/standard").expect("Failed to load config")
}

/// Creates one overnight-capable session per day, starting on the 1st.
fn create_sessions(employee_id: &str, count: u32) -> Vec<AttendanceRecord> {
    (1..=count)
        .map(|day| {
            let at = |time: &str| {
                NaiveDateTime::parse_from_str(&format!("2026-01-{:02} {}", day, time), "%Y-%m-%d %H:%M")
                    .expect("valid timestamp")
            };
            AttendanceRecord {
                id: Some(format!("att_{:03}", day)),
                employee_id: employee_id.to_string(),
                clock_in: at("14:00"),
                clock_out: Some(at("23:30")),
                break_minutes: 30,
                total_worked_minutes: None,
            }
        })
        .collect()
}

fn hourly_employee(id: &str) -> Employee {
    Employee {
        id: id.to_string(),
        compensation: Compensation::Hourly {
            rate: Decimal::new(12_550, 2),
        },
    }
}

/// Benchmark: calculation stages for a half-month of sessions.
fn bench_calculation_stages(c: &mut Criterion) {
    let loader = load_config();
    let schedule = loader
        .deduction_schedule(chrono::NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"))
        .expect("tax table in force");
    let mut group = c.benchmark_group("calculation_stages");

    for sessions in [1u32, 15] {
        let records = create_sessions("emp_bench", sessions);
        group.bench_with_input(BenchmarkId::new("sessions", sessions), &records, |b, records| {
            b.iter(|| {
                let aggregation =
                    aggregate_attendance("emp_bench", black_box(records), loader.policy(), 1)
                        .expect("aggregation");
                let earnings = compute_pay(
                    &aggregation.breakdown,
                    Decimal::new(12_550, 2),
                    loader.policy(),
                    2,
                )
                .expect("earnings");
                let gross = earnings.components.gross().expect("gross");
                let deductions = compute_deductions(gross, &schedule, 3).expect("deductions");
                black_box(deductions)
            })
        });
    }
    group.finish();
}

/// Benchmark: a finalize request through the router.
fn bench_finalize_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let router = create_router(AppState::in_memory(load_config()));
    let body = serde_json::json!({
        "employee": {"id": "emp_bench", "compensation": {"type": "hourly", "rate": "125.50"}},
        "month": 1,
        "year": 2026,
        "period": 1,
        "attendance": create_sessions("emp_bench", 15)
    })
    .to_string();

    c.bench_function("finalize_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/payroll/finalize")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .expect("request"),
                )
                .await
                .expect("response");
            black_box(response)
        })
    });
}

/// Benchmark: batch of 100 employees.
fn bench_batch_100(c: &mut Criterion) {
    let engine = PayrollEngine::new(load_config(), Arc::new(InMemoryPayslipStore::new()));
    let period = PayPeriod::new(1, 2026, HalfPeriod::First).expect("valid period");
    let requests: Vec<FinalizeRequest> = (0..100)
        .map(|i| {
            let id = format!("emp_batch_{:03}", i);
            FinalizeRequest {
                attendance: create_sessions(&id, 10),
                employee: hourly_employee(&id),
                period,
                adjustments: PayAdjustments::NONE,
                basic_salary_override: (i % 3 == 0).then(|| Money::from_minor(2_000_000)),
            }
        })
        .collect();

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));
    group.bench_function("batch_100", |b| {
        b.iter(|| black_box(engine.finalize_batch(black_box(&requests))))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_calculation_stages,
    bench_finalize_request,
    bench_batch_100
);
criterion_main!(benches);
