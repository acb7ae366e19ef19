use rand::SeedableRng;
use rand::rngs::StdRng;

use qpbs_grid_scheduler::api::experiment_dto::ExperimentDto;
use qpbs_grid_scheduler::domain::evaluation::decoherence::DecoherenceModel;
use qpbs_grid_scheduler::domain::experiment::Experiment;
use qpbs_grid_scheduler::domain::experiment::outcome::CombinationSummary;
use qpbs_grid_scheduler::domain::request::{Request, Round};
use qpbs_grid_scheduler::domain::routing::graph::Graph;
use qpbs_grid_scheduler::domain::routing::path_selection::BackupStrategy;
use qpbs_grid_scheduler::domain::schedule::scheduler_type::SchedulerType;
use qpbs_grid_scheduler::domain::topology::{NodeId, Topology};
use qpbs_grid_scheduler::domain::utils::id::RequestId;
use qpbs_grid_scheduler::error::Error;
use qpbs_grid_scheduler::loader::parser::parse_json_str;
use qpbs_grid_scheduler::report::log_writer::ReportWriter;
use qpbs_grid_scheduler::report::statistics::StatisticsWriter;
use qpbs_grid_scheduler::run_experiment_from_file;

const MINIMAL_CONFIG: &str = r#"{
    "systemSizes": [16],
    "requestNumbers": [10],
    "rounds": 2,
    "failureProbability": 0.1,
    "reportFile": "results.txt"
}"#;

fn config(system_sizes: &str, request_numbers: &str, rounds: usize, extra: &str) -> ExperimentDto {
    let json = format!(
        r#"{{
            "systemSizes": {},
            "requestNumbers": {},
            "rounds": {},
            "failureProbability": 0.1,
            "reportFile": "results.txt"{}
        }}"#,
        system_sizes, request_numbers, rounds, extra
    );
    parse_json_str(&json).unwrap()
}

fn run(dto: &ExperimentDto, seed: u64) -> Vec<CombinationSummary> {
    let experiment = Experiment::from_dto(dto).unwrap();
    experiment.run(&mut StdRng::seed_from_u64(seed)).unwrap()
}

/// Extracts `value` from `"... <label>: <value>, ..."`.
fn value_after(line: &str, label: &str) -> u64 {
    let start = line.find(&format!("{}: ", label)).unwrap_or_else(|| panic!("'{}' not found in '{}'", label, line)) + label.len() + 2;
    line[start..].chars().take_while(|c| c.is_ascii_digit()).collect::<String>().parse().unwrap()
}

#[test]
fn test_dto_defaults() {
    let dto: ExperimentDto = parse_json_str(MINIMAL_CONFIG).unwrap();

    assert_eq!(dto.system_sizes, vec![16]);
    assert_eq!(dto.k_paths, 10);
    assert_eq!((dto.weights.k, dto.weights.c, dto.weights.a), (1.0, 1.0, 1.0));
    assert_eq!(dto.decoherence.rate, 0.0);
    assert_eq!(dto.decoherence.model, DecoherenceModel::RateOnly);
    assert_eq!(dto.backup_strategy, BackupStrategy::Longest);
    assert_eq!(dto.seed, None);
    assert_eq!(dto.statistics_file, None);
}

#[test]
fn test_dto_full() {
    let dto = config(
        "[25, 36]",
        "[5]",
        3,
        r#", "kPaths": 4, "weights": {"k": 2.0, "c": 0.5, "a": 2.0}, "decoherence": {"rate": 0.2, "model": "DistanceScaled"},
           "backupStrategy": "MostDisjoint", "seed": 9, "statisticsFile": "stats.csv""#,
    );

    assert_eq!(dto.k_paths, 4);
    assert_eq!(dto.decoherence.model, DecoherenceModel::DistanceScaled);
    assert_eq!(dto.backup_strategy, BackupStrategy::MostDisjoint);
    assert_eq!(dto.seed, Some(9));
    assert_eq!(dto.statistics_file.as_deref(), Some("stats.csv"));

    let experiment = Experiment::from_dto(&dto).unwrap();
    assert_eq!(experiment.weights.b(), 3.0);
    assert_eq!(experiment.decoherence.rate(), 0.2);
}

#[test]
fn test_malformed_json_is_rejected() {
    let result = parse_json_str::<ExperimentDto>(r#"{ "systemSizes": [16] }"#);
    assert!(matches!(result, Err(Error::DeserializationError(_))));
}

#[test]
fn test_invalid_experiments_are_rejected() {
    assert!(matches!(Experiment::from_dto(&config("[15]", "[10]", 1, "")), Err(Error::InvalidTopologySize(15))));
    assert!(matches!(Experiment::from_dto(&config("[1]", "[10]", 1, "")), Err(Error::InsufficientNodes(1))));
    assert!(matches!(Experiment::from_dto(&config("[16]", "[10]", 0, "")), Err(Error::InvalidConfiguration(_))));
    assert!(matches!(Experiment::from_dto(&config("[]", "[10]", 1, "")), Err(Error::InvalidConfiguration(_))));
    assert!(matches!(Experiment::from_dto(&config("[16]", "[10]", 1, r#", "kPaths": 0"#)), Err(Error::InvalidConfiguration(_))));
    assert!(matches!(
        Experiment::from_dto(&config("[16]", "[10]", 1, r#", "weights": {"k": 0.0, "c": 0.0, "a": 1.0}"#)),
        Err(Error::InvalidConfiguration(_))
    ));
    assert!(matches!(Experiment::from_dto(&config("[16]", "[10]", 1, r#", "decoherence": {"rate": -1.0}"#)), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let dto = config("[16, 25]", "[8, 12]", 3, r#", "decoherence": {"rate": 0.3}"#);

    let first = run(&dto, 1234);
    let second = run(&dto, 1234);

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
    assert_eq!(
        first.iter().map(|summary| (summary.system_size, summary.requests_number)).collect::<Vec<_>>(),
        vec![(16, 8), (16, 12), (25, 8), (25, 12)]
    );
}

#[test]
fn test_delay_totals() {
    let rounds = 4;
    let dto = config("[16, 36]", "[10, 20]", rounds, "");

    for summary in run(&dto, 42) {
        let m = summary.requests_number as u64;
        let sequential = rounds as u64 * m * (m - 1) / 2;

        assert_eq!(summary.rounds.len(), rounds);
        assert_eq!(summary.total_undeliverable(), 0, "Every pair of a full grid is connected");
        assert_eq!(summary.total_delay(SchedulerType::Fifo), sequential);
        assert_eq!(summary.total_delay(SchedulerType::Rrrn), sequential);
        assert!(summary.total_delay(SchedulerType::RrrnMerge) <= summary.total_delay(SchedulerType::Rrrn));
        assert!(summary.total_delay(SchedulerType::FifoMerge) <= summary.total_delay(SchedulerType::Fifo));

        for round in &summary.rounds {
            for policy in SchedulerType::ALL {
                let outcome = round.policy(policy).unwrap();
                assert!(outcome.total_timeslots() >= u64::from(outcome.makespan));
                assert!(outcome.failed + outcome.decohered <= 2 * summary.requests_number);
            }
        }
    }
}

#[test]
fn test_round_with_undeliverable_request() {
    let dto = config("[9]", "[3]", 1, "");
    let experiment = Experiment::from_dto(&dto).unwrap();

    let topology = Topology::grid(9).unwrap();
    let mut graph = Graph::from_topology(&topology);
    graph.isolate_node(NodeId(5));

    let round = Round {
        number: 1,
        requests: vec![
            Request::new(RequestId::new("cut off"), NodeId(1), NodeId(5)),
            Request::new(RequestId::new("diagonal"), NodeId(1), NodeId(9)),
            Request::new(RequestId::new("anti diagonal"), NodeId(3), NodeId(7)),
        ],
    };

    let outcome = experiment.run_round(&topology, &graph, &round, &mut StdRng::seed_from_u64(6)).unwrap();

    assert_eq!(outcome.requests, 3);
    assert_eq!(outcome.undeliverable, 1);

    // Around the ring every diagonal path passes V3 or V7, so the two requests never share a timeslot.
    for policy in SchedulerType::ALL {
        let policy_outcome = outcome.policy(policy).unwrap();
        assert_eq!(policy_outcome.makespan, 2, "{}", policy);
        assert_eq!(policy_outcome.delay, 1, "{}", policy);
    }
}

#[test]
fn test_report_contract() {
    let dto = config("[16]", "[10]", 3, r#", "decoherence": {"rate": 0.5}"#);
    let summaries = run(&dto, 7);
    let summary = &summaries[0];

    let mut report = ReportWriter::new(Vec::new());
    report.write_all(&summaries).unwrap();
    let text = String::from_utf8(report.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "System size: 16");
    assert_eq!(lines[1], "requests number: 10");

    for (index, round) in summary.rounds.iter().enumerate() {
        let line = lines[2 + index];
        assert!(line.starts_with(&format!("Round {} delay - ", round.round)));
        assert_eq!(value_after(line, "FIFO"), round.policy(SchedulerType::Fifo).unwrap().delay);
        assert_eq!(value_after(line, "RRRN Merge"), round.policy(SchedulerType::RrrnMerge).unwrap().delay);
        assert_eq!(value_after(line, "undeliverable"), 0);
    }

    let totals = &lines[5..];
    assert_eq!(totals[0], format!("Total FIFO delay: {}", summary.total_delay(SchedulerType::Fifo)));
    assert_eq!(totals[1], format!("Total FIFO Merge delay: {}", summary.total_delay(SchedulerType::FifoMerge)));
    assert_eq!(totals[2], format!("Total RRRN delay: {}", summary.total_delay(SchedulerType::Rrrn)));
    assert_eq!(totals[3], format!("Total RRRN after merge delay: {}", summary.total_delay(SchedulerType::RrrnMerge)));
    assert_eq!(totals[4], "Total timeslots including failed requests (10rs):");

    // Consumers match the longer labels first since "FIFO" is a prefix of "FIFO Merge".
    for line in &totals[5..9] {
        let policy = if line.contains("FIFO Merge") {
            SchedulerType::FifoMerge
        } else if line.contains("FIFO") {
            SchedulerType::Fifo
        } else if line.contains("RRRN Merge") {
            SchedulerType::RrrnMerge
        } else {
            SchedulerType::Rrrn
        };
        assert_eq!(value_after(line, policy.label()), summary.total_timeslots(policy));
    }

    assert!(totals[9].starts_with("Total failed requests - "));
    assert_eq!(value_after(totals[9], "FIFO Merge"), summary.total_failed(SchedulerType::FifoMerge));
    assert!(totals[10].starts_with("Total decohered requests - "));
    assert_eq!(value_after(totals[10], "RRRN"), summary.total_decohered(SchedulerType::Rrrn));
    assert_eq!(totals[11], "Total undeliverable requests: 0");
    assert_eq!(totals[12], "");
    assert_eq!(lines.len(), 5 + 13);
}

#[test]
fn test_statistics_csv() {
    let dto = config("[16, 25]", "[6]", 2, "");
    let summaries = run(&dto, 3);

    let mut buffer: Vec<u8> = Vec::new();
    {
        let mut statistics = StatisticsWriter::new(&mut buffer);
        statistics.write_all(&summaries).unwrap();
        statistics.flush().unwrap();
    }

    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "SystemSize;RequestsNumber;Round;Policy;Delay;Makespan;Failed;Decohered;TotalTimeslots;Undeliverable");
    assert_eq!(lines.len(), 1 + 2 * 2 * SchedulerType::ALL.len());
    assert!(lines[1].starts_with("16;6;1;FIFO;15;6;"));
    assert!(lines[2].starts_with("16;6;1;RRRN;15;6;"));
}

#[test]
fn test_run_experiment_from_file() {
    let dir = std::env::temp_dir().join(format!("qpbs_grid_scheduler_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let report_file = dir.join("report.txt");
    let statistics_file = dir.join("statistics.csv");
    let config_file = dir.join("experiment.json");

    let json = format!(
        r#"{{ "systemSizes": [9], "requestNumbers": [4], "rounds": 2, "failureProbability": 0.2,
             "reportFile": {:?}, "statisticsFile": {:?} }}"#,
        report_file.to_string_lossy(),
        statistics_file.to_string_lossy()
    );
    std::fs::write(&config_file, json).unwrap();

    let summaries = run_experiment_from_file(&config_file.to_string_lossy(), Some(5)).unwrap();
    assert_eq!(summaries.len(), 1);

    let report = std::fs::read_to_string(&report_file).unwrap();
    assert!(report.starts_with("System size: 9\nrequests number: 4\n"));
    assert_eq!(std::fs::read_to_string(&statistics_file).unwrap().lines().count(), 1 + 2 * 4);

    assert!(matches!(run_experiment_from_file(&dir.join("missing.json").to_string_lossy(), None), Err(Error::IoError(_))));

    std::fs::remove_dir_all(&dir).unwrap();
}
