use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

use orderscope::data::model::columns;

const OUTPUT_PATH: &str = "data/all_data.csv";
const ORDER_COUNT: usize = 2500;
const CUSTOMER_COUNT: usize = 900;

const STATES: [(&str, u32); 8] = [
    ("SP", 40),
    ("RJ", 13),
    ("MG", 12),
    ("RS", 6),
    ("PR", 5),
    ("SC", 4),
    ("BA", 4),
    ("DF", 2),
];

const STATUSES: [(&str, u32); 6] = [
    ("delivered", 90),
    ("shipped", 4),
    ("canceled", 2),
    ("invoiced", 2),
    ("processing", 1),
    ("unavailable", 1),
];

/// (category, typical price)
const CATEGORIES: [(&str, f64); 10] = [
    ("bed_bath_table", 90.0),
    ("health_beauty", 130.0),
    ("sports_leisure", 110.0),
    ("furniture_decor", 85.0),
    ("computers_accessories", 120.0),
    ("housewares", 90.0),
    ("watches_gifts", 200.0),
    ("telephony", 70.0),
    ("garden_tools", 110.0),
    ("auto", 140.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }

    fn weighted<'a, T>(&mut self, choices: &'a [(T, u32)]) -> &'a T {
        let total: u32 = choices.iter().map(|(_, w)| w).sum();
        let mut pick = self.below(total as u64) as u32;
        for (value, weight) in choices {
            if pick < *weight {
                return value;
            }
            pick -= weight;
        }
        &choices[choices.len() - 1].0
    }
}

fn hex_id(rng: &mut SimpleRng) -> String {
    format!("{:016x}{:016x}", rng.next_u64(), rng.next_u64())
}

fn fmt_ts(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn fmt_opt(ts: Option<NaiveDateTime>) -> String {
    ts.map(fmt_ts).unwrap_or_default()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let customers: Vec<(String, &str)> = (0..CUSTOMER_COUNT)
        .map(|_| (hex_id(&mut rng), *rng.weighted(&STATES)))
        .collect();

    let epoch = NaiveDate::from_ymd_opt(2017, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("building start date")?;
    let span_seconds = 20 * 30 * 24 * 3600;

    if let Some(dir) = Path::new(OUTPUT_PATH).parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer =
        csv::Writer::from_path(OUTPUT_PATH).with_context(|| format!("creating {OUTPUT_PATH}"))?;
    writer.write_record(columns::ALL)?;

    let mut rows = 0usize;
    for _ in 0..ORDER_COUNT {
        let order_id = hex_id(&mut rng);
        let (customer_id, state) = &customers[rng.below(CUSTOMER_COUNT as u64) as usize];
        let status = *rng.weighted(&STATUSES);

        let purchased = epoch + Duration::seconds(rng.below(span_seconds) as i64);
        let approved = (status != "canceled")
            .then(|| purchased + Duration::minutes(10 + rng.below(2 * 24 * 60) as i64));
        let carrier = approved
            .filter(|_| matches!(status, "delivered" | "shipped"))
            .map(|a| a + Duration::hours(12 + rng.below(72) as i64));
        let delivered = carrier
            .filter(|_| status == "delivered")
            .map(|c| c + Duration::days(2 + rng.below(20) as i64));
        let estimated = purchased
            .date()
            .and_hms_opt(0, 0, 0)
            .map(|d| d + Duration::days(20 + rng.below(15) as i64));

        let review = if rng.next_f64() < 0.01 {
            None
        } else if delivered.is_some() {
            Some(*rng.weighted(&[(5u8, 57), (4, 19), (3, 8), (2, 3), (1, 11)]))
        } else {
            Some(*rng.weighted(&[(1u8, 60), (2, 10), (3, 15), (4, 10), (5, 5)]))
        };

        let items = 1 + rng.below(3) as usize;
        for _ in 0..items {
            let (category, typical) = CATEGORIES[rng.below(CATEGORIES.len() as u64) as usize];
            let category = if rng.next_f64() < 0.02 { "" } else { category };
            let qty = 1 + rng.below(3);
            let price = (typical * (0.3 + 1.4 * rng.next_f64()) * 100.0).round() / 100.0;
            let freight = ((8.0 + 25.0 * rng.next_f64()) * 100.0).round() / 100.0;
            let payment = ((price + freight) * qty as f64 * 100.0).round() / 100.0;

            writer.write_record([
                order_id.clone(),
                customer_id.clone(),
                status.to_string(),
                fmt_ts(purchased),
                fmt_opt(approved),
                fmt_opt(carrier),
                fmt_opt(delivered),
                fmt_opt(estimated),
                state.to_string(),
                category.to_string(),
                qty.to_string(),
                format!("{price:.2}"),
                format!("{freight:.2}"),
                format!("{payment:.2}"),
                review.map(|r| r.to_string()).unwrap_or_default(),
            ])?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} order rows ({ORDER_COUNT} orders) to {OUTPUT_PATH}");
    Ok(())
}
