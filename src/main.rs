use purchase_stats::{load_purchases, AnalysisReport, ReportOptions, DEFAULT_PURCHASES_PATH};

fn main() {
    env_logger::init();

    let dataset = load_purchases(DEFAULT_PURCHASES_PATH);
    if dataset.is_empty() {
        println!("No data to analyze.");
        return;
    }

    let report = AnalysisReport::build(&dataset, &ReportOptions::default());
    println!("{report}");
}
