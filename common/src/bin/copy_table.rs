use card_catalog_common::{CopyTier, POINT_BANDS};
use std::env;

/// ポイント帯ごとのコピー枚数・累積境界を表示する。
/// 引数にポイントを渡すとその帯だけを表示する。
fn main() {
    let args: Vec<String> = env::args().collect();

    if let Some(raw) = args.get(1) {
        let Ok(point) = raw.trim().parse::<i64>() else {
            eprintln!("Usage: copy_table [point]");
            std::process::exit(1);
        };
        match CopyTier::for_point(point) {
            Some(tier) => print_tier(&format!("point {}", point), &tier),
            None => {
                eprintln!("point {} is outside every band (1-99)", point);
                std::process::exit(1);
            }
        }
        return;
    }

    for band in POINT_BANDS {
        let tier = CopyTier::from_counts(band.counts);
        print_tier(&format!("[{:>2}, {:>3})", band.lower, band.upper), &tier);
    }
}

fn print_tier(label: &str, tier: &CopyTier) {
    let interval: Vec<String> = tier.interval.iter().map(|(t, c)| format!("{}:{}", t, c)).collect();
    let cumulated: Vec<String> = tier.cumulated.iter().map(|(t, c)| format!("{}:{}", t, c)).collect();
    println!(
        "{}  interval {{{}}}  cumulated {{{}}}  total {}",
        label,
        interval.join(", "),
        cumulated.join(", "),
        tier.total()
    );
}
