use std::fs;

use clap::ArgMatches;
use serde_json::Value;

use crate::assess::ensure_undirected;
use crate::csr::CsrGraph;
use crate::graph::{ColorId, Graph, VertexId};

/** reads command line input, loads and verifies the instance; returns the
instance name, the graph, the number of rounds and the optional
solution/stats filenames */
pub fn read_params(main_args: ArgMatches) -> (String, CsrGraph, usize, Option<String>, Option<String>) {
    let inst_filename = main_args.value_of("instance").unwrap();
    let nb_rounds: usize = main_args.value_of("rounds").unwrap_or("1").parse()
        .expect("unable to parse the number of rounds");
    // read value of the solution filename
    let sol_file: Option<String> = match main_args.value_of("solution") {
        None => None,
        Some(e) => {
            println!("printing solutions in: {}", e);
            Some(e.to_string())
        }
    };
    // read value of the performance logs filename
    let perf_file: Option<String> = match main_args.value_of("perf") {
        None => None,
        Some(e) => {
            println!("printing perfs in: {}\n", e);
            Some(e.to_string())
        }
    };
    // read instance file
    let graph = if main_args.is_present("binary") {
        CsrGraph::from_binary_file(inst_filename)
    } else {
        CsrGraph::from_file(inst_filename)
    };
    // `-s` is only a declaration; the check runs either way and exits with
    // code 2 on a violation
    ensure_undirected(&graph);
    graph.display_statistics();
    println!("=======================");
    (inst_filename.to_string(), graph, nb_rounds, sol_file, perf_file)
}

/// groups a color vector into color classes
pub fn colors_to_partition(colors: &[ColorId]) -> Vec<Vec<VertexId>> {
    let nb_colors = colors.iter().max().map_or(0, |c| c + 1);
    let mut partition = vec![Vec::new(); nb_colors];
    for (v, c) in colors.iter().enumerate() {
        partition[*c].push(v);
    }
    partition
}

/** writes a string encoding the solution, one line per color class (use this
to export the solution) */
pub fn solution_to_string(solution: &[Vec<VertexId>]) -> String {
    let mut res = String::default();
    for class in solution {
        for v in class {
            res += format!("{} ", v).as_str();
        }
        res += "\n";
    }
    res
}

/// exports coloring results to files
pub fn export_results(
    colors: &[ColorId],
    stats: &Value,
    perf_file: Option<String>,
    sol_file: Option<String>,
) {
    // export statistics
    match perf_file {
        None => {}
        Some(filename) => {
            let mut file = match fs::File::create(filename.as_str()) {
                Err(why) => panic!("couldn't create {}: {}", filename, why),
                Ok(file) => file,
            };
            if let Err(why) = std::io::Write::write(
                &mut file, serde_json::to_string(stats).unwrap().as_bytes()
            ) { panic!("couldn't write: {}", why) };
        }
    }
    // export solution
    match sol_file {
        None => {}
        Some(filename) => {
            let solution = colors_to_partition(colors);
            fs::write(filename.as_str(), solution_to_string(&solution))
                .unwrap_or_else(|_|
                    panic!("export_results: unable to write the solution in {}", filename)
                );
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_to_partition() {
        let partition = colors_to_partition(&[0, 1, 0, 2]);
        assert_eq!(partition, vec![vec![0, 2], vec![1], vec![3]]);
    }

    #[test]
    fn test_partition_of_empty_coloring() {
        assert!(colors_to_partition(&[]).is_empty());
    }

    #[test]
    fn test_solution_to_string() {
        let s = solution_to_string(&[vec![0, 2], vec![1]]);
        assert_eq!(s, "0 2 \n1 \n");
    }
}
