use crate::{POOL, integration, methods, model};
use chrono::{NaiveTime, Utc};
use currency_rs::Currency;
use diesel::prelude::*;
use std::time::Duration;

/// Nightly financial-warnings sweep: every active contract past its
/// scheduled drop-off gets a line in an ops email with the late fee it has
/// accrued so far. Advisory only; nothing is written.
pub async fn nightly_task() {
    loop {
        let now = Utc::now();
        let midnight = now
            .date_naive()
            .succ_opt()
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let duration_until_midnight = (midnight - now.naive_utc())
            .to_std()
            .unwrap_or_else(|_| Duration::from_secs(1));

        tokio::time::sleep(duration_until_midnight).await;

        println!("====== Running Daily Tasks ======");

        use crate::schema::contracts::dsl as contract_q;
        use crate::schema::customers::dsl as customer_q;

        let mut pool = match POOL.get() {
            Ok(conn) => conn,
            Err(e) => {
                eprintln!("nightly_task: pool unavailable: {:?}", e);
                continue;
            }
        };

        let now = Utc::now();
        let overdue = contract_q::contracts
            .inner_join(customer_q::customers)
            .filter(contract_q::status.eq(model::ContractStatus::Active))
            .filter(contract_q::end_time.lt(now))
            .order(contract_q::end_time.asc())
            .get_results::<(model::Contract, model::Customer)>(&mut pool);

        let Ok(overdue) = overdue else {
            eprintln!("nightly_task: overdue query failed");
            continue;
        };

        if overdue.is_empty() {
            println!("===== Daily Tasks Completed =====");
            continue;
        }

        let mut lines = Vec::new();
        for (contract, customer) in &overdue {
            let projected =
                methods::charges::late_fee(contract.end_time, now, contract.daily_rate);
            lines.push(format!(
                "Contract {} — {} — due {} — late fee so far {}",
                contract.confirmation,
                customer.name,
                contract.end_time.format("%Y-%m-%d %H:%M UTC"),
                Currency::new_float(projected, None).format(),
            ));
        }
        let body = format!(
            "{} contract(s) past their scheduled drop-off:<br><br>{}",
            overdue.len(),
            lines.join("<br>")
        );

        let result = integration::sendgrid_ops::send_email(
            Option::from("RentDesk Server"),
            integration::sendgrid_ops::ops_inbox(),
            "Overdue Contract Warnings",
            &body,
            None,
        )
        .await;
        if let Err(e) = result {
            eprintln!("nightly_task: warnings email failed: {:?}", e);
        }

        println!("===== Daily Tasks Completed =====");
    }
}
