//! Scenario and property tests for the shortest-path engine.

use super::*;
use crate::domain::{ComplexId, GeoPoint, QueryError, Station, StationId};
use crate::network::{CostMode, FactorWeights, Graph, build_graph};
use crate::registry::{RawStation, StationSet};

fn station(id: u32, lat: f64, lon: f64, line: &str, complex: u32) -> Station {
    Station::new(
        StationId(id),
        GeoPoint::new(lat, lon),
        format!("S{id}"),
        line,
        ComplexId(complex),
        0.0,
    )
}

fn table(stations: Vec<Station>, mode: CostMode) -> RouteTable {
    let set = StationSet::from_stations(stations).unwrap();
    RouteTable::from_stations(set, NetworkConfig::default(), mode)
}

fn ids(raw: &[u32]) -> Vec<StationId> {
    raw.iter().copied().map(StationId).collect()
}

/// Sum of edge costs along `path`.
fn path_cost(stations: &StationSet, graph: &Graph, mode: CostMode, path: &[StationId]) -> f64 {
    path.windows(2)
        .map(|hop| {
            let from = stations.index_of(hop[0]).unwrap();
            let to = stations.get(hop[1]).unwrap();
            let edge = graph.edge(from, hop[1]).unwrap();
            mode.edge_cost(&stations[from], to, edge.weight_km)
        })
        .sum()
}

#[test]
fn adjacent_on_same_line() {
    let table = table(
        vec![
            station(1, 40.750, -73.98, "1", 10),
            station(2, 40.760, -73.98, "1", 20),
        ],
        CostMode::Distance,
    );

    let expected = table.stations()[0].distance_km(&table.stations()[1]);
    let edge = table.graph().edge(0, StationId(2)).unwrap();
    assert_eq!(edge.weight_km, expected);
    assert!(!edge.is_walk());

    assert_eq!(table.distance(StationId(1), StationId(2)), Ok(Some(expected)));
    assert_eq!(
        table.shortest_path(StationId(1), StationId(2)).unwrap(),
        ids(&[1, 2])
    );
}

#[test]
fn same_complex_costs_nothing() {
    // Far-apart platforms of one complex, plus a long line detour.
    let table = table(
        vec![
            station(1, 40.750, -73.98, "1", 611),
            station(2, 40.800, -73.98, "1", 700),
            station(3, 40.850, -73.98, "N", 611),
        ],
        CostMode::Distance,
    );

    assert_eq!(table.distance(StationId(1), StationId(3)), Ok(Some(0.0)));
    assert_eq!(
        table.shortest_path(StationId(1), StationId(3)).unwrap(),
        ids(&[1, 3])
    );

    let itinerary = table.plan(StationId(1), StationId(3)).unwrap().unwrap();
    assert_eq!(itinerary.steps[1].kind, StepKind::Transfer);
    assert_eq!(itinerary.cost, 0.0);
}

#[test]
fn nearby_stations_are_joined_by_a_walk() {
    // 1 -(line)- 2 ~50 m~ 3
    let table = table(
        vec![
            station(1, 40.74000, -73.98, "1", 10),
            station(2, 40.75000, -73.98, "1", 20),
            station(3, 40.75045, -73.98, "N", 30),
        ],
        CostMode::Distance,
    );

    let walk = table.graph().edge(1, StationId(3)).unwrap();
    assert!(walk.is_walk());
    assert_eq!(walk.transfer.unwrap().to_string(), "2|3");
    assert!((walk.weight_km - 0.05).abs() < 0.001);

    let itinerary = table.plan(StationId(1), StationId(3)).unwrap().unwrap();
    let kinds: Vec<_> = itinerary.steps.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![StepKind::Start, StepKind::Ride, StepKind::Walk]);
}

#[test]
fn unknown_origin_leaves_matrices_untouched() {
    let table = table(
        vec![
            station(1, 40.750, -73.98, "1", 10),
            station(2, 40.760, -73.98, "1", 20),
        ],
        CostMode::Distance,
    );
    let before = table.paths().clone();

    assert_eq!(
        table.shortest_path(StationId(77), StationId(2)),
        Err(QueryError::StationNotFound(StationId(77)))
    );
    assert_eq!(table.paths(), &before);
}

#[test]
fn origin_equals_destination() {
    let table = table(
        vec![
            station(1, 40.750, -73.98, "1", 10),
            station(2, 40.760, -73.98, "1", 20),
        ],
        CostMode::Distance,
    );

    assert_eq!(
        table.shortest_path(StationId(2), StationId(2)).unwrap(),
        ids(&[2])
    );
    assert_eq!(table.distance(StationId(2), StationId(2)), Ok(Some(0.0)));

    let itinerary = table.plan(StationId(2), StationId(2)).unwrap().unwrap();
    assert_eq!(itinerary.connections(), 0);
    assert_eq!(itinerary.distance_km, 0.0);
}

#[test]
fn shortcut_through_complex_beats_long_ride() {
    // Line 1: 1 - 2 - 3 - 4 heading north; line N: 5 - 6 heading north.
    // 1/5 and 4/6 share complexes, and line N is a straight express.
    let table = table(
        vec![
            station(1, 40.700, -73.980, "1", 100),
            station(2, 40.710, -73.900, "1", 200),
            station(3, 40.720, -73.900, "1", 300),
            station(4, 40.730, -73.980, "1", 400),
            station(5, 40.700, -73.980, "N", 100),
            station(6, 40.730, -73.980, "N", 400),
        ],
        CostMode::Distance,
    );

    let path = table.shortest_path(StationId(1), StationId(4)).unwrap();
    assert_eq!(path, ids(&[1, 5, 6, 4]));

    let cost = table.distance(StationId(1), StationId(4)).unwrap().unwrap();
    let express = table.stations()[4].distance_km(&table.stations()[5]);
    assert!((cost - express).abs() < 1e-12);
}

#[test]
fn factor_mode_prefers_safer_route() {
    // Two mirror-image branches from 1 to 4. The east branch passes a risky
    // station, the west one is reached through the complexes of 1 and 4.
    let risky = Station::new(
        StationId(2),
        GeoPoint::new(40.710, -73.970),
        "S2",
        "E",
        ComplexId(2),
        5.0,
    );
    let stations = vec![
        station(1, 40.700, -73.980, "E", 1),
        risky,
        station(4, 40.720, -73.980, "E", 4),
        station(5, 40.700, -73.980, "W", 1),
        station(3, 40.710, -73.990, "W", 3),
        station(6, 40.720, -73.980, "W", 4),
    ];

    let distance = table(stations.clone(), CostMode::Distance);
    let factor = table(stations, CostMode::Factor(FactorWeights::default()));

    let by_distance = distance.distance(StationId(1), StationId(4)).unwrap().unwrap();
    let east = distance.stations()[0].distance_km(&distance.stations()[1])
        + distance.stations()[1].distance_km(&distance.stations()[2]);
    assert!((by_distance - east).abs() < 1e-9);

    let via_factor = factor.shortest_path(StationId(1), StationId(4)).unwrap();
    assert_eq!(via_factor, ids(&[1, 5, 3, 6, 4]));
    assert_eq!(factor.mode().name(), "factor");
}

#[test]
fn rebuild_from_records_is_idempotent() {
    let records = vec![
        RawStation::new("40.750", "-73.98", "A", "1", "1"),
        RawStation::new("40.760", "-73.98", "B", "1", "2"),
        RawStation::new("40.7604", "-73.98", "C", "N", "3"),
        RawStation::new("40.770", "-73.98", "D", "N", "2"),
        RawStation::new("40.750", "-73.98", "A", "1", "1"),
    ];

    let first = RouteTable::build(&records, NetworkConfig::default(), CostMode::Distance).unwrap();
    let second = RouteTable::build(&records, NetworkConfig::default(), CostMode::Distance).unwrap();

    let first_ids: Vec<_> = first.stations().iter().map(Station::id).collect();
    let second_ids: Vec<_> = second.stations().iter().map(Station::id).collect();
    assert_eq!(first_ids, ids(&[1, 2, 3, 4]));
    assert_eq!(first_ids, second_ids);

    for i in 0..first.stations().len() {
        assert_eq!(first.graph().neighbors(i), second.graph().neighbors(i));
    }
    assert_eq!(first.paths(), second.paths());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    const LINES: [&str; 3] = ["1", "N", "7"];

    /// Small random networks clustered in a few km² so line, complex and
    /// walk edges all occur.
    fn network_strategy() -> impl Strategy<Value = Vec<Station>> {
        prop::collection::vec(
            (0.0f64..0.02, 0.0f64..0.02, 0usize..3, 0u32..6),
            1..12,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (dlat, dlon, line, complex))| {
                    station(
                        i as u32 + 1,
                        40.70 + dlat,
                        -73.98 + dlon,
                        LINES[line],
                        complex,
                    )
                })
                .collect()
        })
    }

    fn mode_strategy() -> impl Strategy<Value = CostMode> {
        prop_oneof![
            Just(CostMode::Distance),
            Just(CostMode::Factor(FactorWeights::default())),
        ]
    }

    proptest! {
        #[test]
        fn diagonal_is_zero_and_self(stations in network_strategy(), mode in mode_strategy()) {
            let table = table(stations, mode);
            let paths = table.paths();

            for s in 0..paths.size() {
                prop_assert_eq!(paths.distances.get(s, s), Some(0.0));
                prop_assert_eq!(paths.predecessors.get(s, s), Some(s));
            }
        }

        #[test]
        fn distances_are_symmetric(stations in network_strategy(), mode in mode_strategy()) {
            let table = table(stations, mode);
            let d = &table.paths().distances;

            for i in 0..d.size() {
                for j in 0..d.size() {
                    prop_assert_eq!(d.get(i, j), d.get(j, i));
                }
            }
        }

        #[test]
        fn triangle_inequality(stations in network_strategy(), mode in mode_strategy()) {
            let table = table(stations, mode);
            let d = &table.paths().distances;
            let n = d.size();

            for i in 0..n {
                for j in 0..n {
                    for k in 0..n {
                        if let (Some(ik), Some(kj)) = (d.get(i, k), d.get(k, j)) {
                            let ij = d.get(i, j);
                            prop_assert!(ij.is_some(), "{i}->{j} unreachable via {k}");
                            let ij = ij.unwrap_or_default();
                            prop_assert!(ij <= ik + kj + 1e-9, "d[{i}][{j}]={ij} > {ik}+{kj}");
                        }
                    }
                }
            }
        }

        #[test]
        fn path_cost_matches_distance(stations in network_strategy(), mode in mode_strategy()) {
            let table = table(stations, mode);
            let set = table.stations();
            let d = &table.paths().distances;

            for a in set {
                for b in set {
                    let path = table.shortest_path(a.id(), b.id()).unwrap();
                    let (i, j) = (set.index_of(a.id()).unwrap(), set.index_of(b.id()).unwrap());
                    match d.get(i, j) {
                        Some(expected) => {
                            prop_assert_eq!(path.first(), Some(&a.id()));
                            prop_assert_eq!(path.last(), Some(&b.id()));
                            let cost = path_cost(set, table.graph(), mode, &path);
                            prop_assert!(
                                (cost - expected).abs() <= 1e-9 * expected.max(1.0),
                                "{} -> {}: path {:?} costs {} but matrix says {}",
                                a.id(), b.id(), path, cost, expected
                            );
                        }
                        None => prop_assert!(path.is_empty()),
                    }
                }
            }
        }

        #[test]
        fn rebuild_is_deterministic(stations in network_strategy(), mode in mode_strategy()) {
            let first = table(stations.clone(), mode);
            let second = table(stations, mode);
            prop_assert_eq!(first.paths(), second.paths());
        }

        #[test]
        fn graph_matches_station_count(stations in network_strategy()) {
            let set = StationSet::from_stations(stations).unwrap();
            let graph = build_graph(&set, 100.0);
            prop_assert_eq!(graph.station_count(), set.len());
        }
    }
}
