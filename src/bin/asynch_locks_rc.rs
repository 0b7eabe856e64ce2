use std::time::Instant;

use clap::{load_yaml, App};
use serde_json::json;

use parcolor::assess::assess_coloring;
use parcolor::engine::asynch_locks::color_asynch_locks_rc;
use parcolor::store::ColorSeed;
use parcolor::util::{export_results, read_params};

/** colors an instance with the read-commit locking engine */
pub fn main() {
    // parse arguments
    let yaml = load_yaml!("asynch_locks_rc.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let (inst_filename, graph, nb_rounds, sol_file, perf_file) = read_params(main_args);

    // solve it
    let t_start = Instant::now();
    let mut colors = Vec::new();
    for _ in 0..nb_rounds {
        colors = color_asynch_locks_rc(&graph, ColorSeed::MaxDegree, true);
    }
    let duration = t_start.elapsed().as_secs_f32();

    // assess the final coloring
    let assessment = assess_coloring(&graph, &colors);
    assessment.report();
    let stats = json!({
        "max_color": assessment.max_color,
        "nb_conflicting": assessment.nb_conflicting,
        "nb_not_minimal": assessment.nb_not_minimal,
        "time_searched": duration,
        "nb_rounds": nb_rounds,
        "inst_name": inst_filename
    });

    // export results
    export_results(&colors, &stats, perf_file, sol_file);
}
