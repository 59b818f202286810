use super::*;
use crate::graph::Graph;

const TOL: f64 = 1e-9;

fn triangle() -> Graph {
    Graph::with_vertex_count(3, vec![(1, 2), (2, 3), (1, 3)]).unwrap()
}

fn path(n: u32) -> Graph {
    Graph::with_vertex_count(n, (1..n).map(|v| (v, v + 1)).collect()).unwrap()
}

fn single_edge() -> Graph {
    Graph::with_vertex_count(2, vec![(1, 2)]).unwrap()
}

/// Every assignment of colors `1..=max` to the graph's vertices.
fn all_colorings(graph: &Graph, max: u32) -> Vec<Coloring> {
    let mut colorings = vec![Coloring::new()];
    for &vertex in graph.vertices() {
        colorings = colorings
            .into_iter()
            .flat_map(|partial| {
                (1..=max).map(move |color| {
                    let mut next = partial.clone();
                    next.assign(vertex, color);
                    next
                })
            })
            .collect();
    }
    colorings
}

fn chromatic_number(graph: &Graph) -> usize {
    let max = graph.max_degree() + 1;
    all_colorings(graph, max)
        .iter()
        .filter(|coloring| coloring.is_proper(graph))
        .map(Coloring::num_colors)
        .min()
        .unwrap_or(0)
}

/// Smallest objective over all feasible 0/1 vectors of the model.
fn brute_force_optimum(built: &ColoringModel) -> f64 {
    let model = built.model();
    let n = model.num_variables();
    assert!(n <= 18, "too many variables to enumerate: {n}");
    let mut best = f64::INFINITY;
    for mask in 0u32..(1 << n) {
        let values: Vec<f64> = (0..n).map(|bit| f64::from((mask >> bit) & 1)).collect();
        if model.violations(&values, TOL).unwrap().is_empty() {
            best = best.min(model.objective_value(&values).unwrap());
        }
    }
    best
}

#[test]
fn test_formulation_names_parse() {
    assert_eq!("ASSB".parse::<Formulation>(), Ok(Formulation::Assb));
    assert_eq!("post".parse::<Formulation>(), Ok(Formulation::Post));
    assert_eq!(Formulation::Po.to_string(), "PO");
    let err = "XY".parse::<Formulation>().unwrap_err();
    assert!(err.to_string().contains("'XY'"));
}

#[test]
fn test_family_counts_are_exact() {
    // path 1-2-3-4 with edge (2,3) repeated: max degree 3, four colors
    let graph = Graph::with_vertex_count(4, vec![(1, 2), (2, 3), (3, 4), (3, 2)]).unwrap();
    let (n, m, k) = (4, 4, 4);
    assert_eq!(graph.max_degree() as usize + 1, k);

    let expected = |family: ConstraintFamily| match family {
        ConstraintFamily::Assignment => n,
        ConstraintFamily::LinkConflict => m * k,
        ConstraintFamily::UsageLink => k,
        ConstraintFamily::ColorOrdering => k - 1,
        ConstraintFamily::FirstColor | ConstraintFamily::LastColor => n,
        ConstraintFamily::Monotonicity
        | ConstraintFamily::Complementarity
        | ConstraintFamily::Dominance => n * (k - 1),
        ConstraintFamily::OrderConflict => m * k,
        ConstraintFamily::Recovery => n * k,
        ConstraintFamily::DirectConflict => m * k,
    };

    for formulation in Formulation::ALL {
        let built = build(formulation, &graph).unwrap();
        let counts = built.family_counts();
        let total: usize = counts.iter().map(|(_, count)| count).sum();
        for (family, count) in &counts {
            assert_eq!(*count, expected(*family), "{formulation} {family}");
            assert_eq!(*count, family.expected_rows(n, m, k), "{formulation} {family}");
        }
        assert_eq!(total, built.model().num_constraints(), "{formulation}");
    }
}

#[test]
fn test_variable_blocks_follow_formulation() {
    let graph = single_edge();
    for formulation in Formulation::ALL {
        let built = build(formulation, &graph).unwrap();
        assert_eq!(built.x().is_some(), formulation.has_assignment(), "{formulation}");
        assert_eq!(built.g().is_some(), formulation.has_order(), "{formulation}");
        assert_eq!(built.l().is_some(), formulation.has_order(), "{formulation}");
        assert_eq!(built.w().is_some(), !formulation.has_order(), "{formulation}");
    }
    assert!(!Formulation::Po.has_assignment());
    assert!(Formulation::Post.has_assignment() && Formulation::Post.has_order());
}

#[test]
fn test_variable_counts_per_formulation() {
    let graph = path(4);
    let (n, k) = (4, 3);
    let variables = |formulation| build(formulation, &graph).unwrap().model().num_variables();
    assert_eq!(variables(Formulation::As), n * k + k);
    assert_eq!(variables(Formulation::Assb), n * k + k);
    assert_eq!(variables(Formulation::Po), 2 * n * k);
    assert_eq!(variables(Formulation::Post), 3 * n * k);
}

#[test]
fn test_models_are_pure_binary_and_named() {
    let graph = triangle();
    for formulation in Formulation::ALL {
        let built = build(formulation, &graph).unwrap();
        let model = built.model();
        assert!(model.is_pure_binary(), "{formulation}");
        for (id, _) in model.constraints() {
            assert!(model.get_constraint_name(id).is_some(), "{formulation} {id}");
        }
        for (id, _) in model.variables() {
            assert!(model.get_variable_name(id).is_some(), "{formulation} {id}");
        }
    }
}

#[test]
fn test_row_shapes_match_names() {
    let built = build(Formulation::Post, &single_edge()).unwrap();
    let model = built.model();
    let x = built.x().unwrap();
    let g = built.g().unwrap();
    let l = built.l().unwrap();

    let recover = model.get_constraint_by_name("recover(2,c1)").unwrap();
    let row = &model.rows()[recover.index()];
    let mut expected = vec![
        (x.get(2, 1).unwrap(), 1.0),
        (g.get(2, 1).unwrap(), 1.0),
        (l.get(2, 1).unwrap(), 1.0),
    ];
    expected.sort_by_key(|(var, _)| *var);
    assert_eq!(row, &expected);

    let dominance = model.get_constraint_by_name("dominance(2,c1)").unwrap();
    let row = &model.rows()[dominance.index()];
    let mut expected = vec![(g.get(1, 1).unwrap(), 1.0), (g.get(2, 1).unwrap(), -1.0)];
    expected.sort_by_key(|(var, _)| *var);
    assert_eq!(row, &expected);

    let w_free = build(Formulation::As, &single_edge()).unwrap();
    let conflict = w_free.model().get_constraint_by_name("conflict(1,2,c2)").unwrap();
    let bounds = w_free.model().get_constraint(conflict).unwrap().bounds;
    assert_eq!(bounds.upper, 0.0);
    assert_eq!(w_free.model().rows()[conflict.index()].len(), 3);
}

#[test]
fn test_po_objective_reads_reference_vertex() {
    let built = build(Formulation::Po, &Graph::new([4, 9], vec![(4, 9)]).unwrap()).unwrap();
    assert_eq!(built.reference_vertex(), Some(4));
    let objective = built.model().objective();
    assert_eq!(objective.constant, 1.0);
    let g = built.g().unwrap();
    let expected: Vec<_> = built
        .colors()
        .iter()
        .map(|i| (g.get(4, i).unwrap(), 1.0))
        .collect();
    assert_eq!(objective.terms, expected);
}

#[test]
fn test_empty_graph_models() {
    let graph = Graph::new(Vec::new(), Vec::new()).unwrap();

    let as_model = build(Formulation::As, &graph).unwrap();
    assert_eq!(as_model.model().num_variables(), 1);
    assert_eq!(as_model.model().num_constraints(), 0);
    let w1 = as_model.w().unwrap().get(1).unwrap();
    assert_eq!(as_model.model().get_variable_name(w1), Some("w(1)"));
    assert_eq!(as_model.model().objective_value(&[0.0]).unwrap(), 0.0);

    for formulation in [Formulation::Po, Formulation::Post] {
        let built = build(formulation, &graph).unwrap();
        assert_eq!(built.model().num_variables(), 0);
        assert_eq!(built.model().num_constraints(), 0);
        assert_eq!(built.model().objective().constant, 0.0);
        assert!(built.decode(&[]).unwrap().is_empty());
    }
}

#[test]
fn test_canonical_encodings_of_proper_colorings_are_feasible() {
    for graph in [triangle(), path(4), single_edge()] {
        let colors = ColorDomain::from_max_degree(graph.max_degree());
        for formulation in Formulation::ALL {
            let built = build(formulation, &graph).unwrap();
            for coloring in all_colorings(&graph, colors.max_color()) {
                if !coloring.is_proper(&graph) {
                    continue;
                }
                let canonical = coloring.canonical(graph.reference_vertex());
                let values = built.encode(&canonical).unwrap();
                assert!(
                    built.model().is_feasible(&values, TOL).unwrap(),
                    "{formulation} rejects {canonical:?}: {:?}",
                    built.model().violations(&values, TOL).unwrap()
                );
                assert_eq!(
                    built.model().objective_value(&values).unwrap(),
                    canonical.num_colors() as f64,
                    "{formulation} {canonical:?}"
                );
                assert_eq!(built.decode(&values).unwrap(), canonical);
            }
        }
    }
}

#[test]
fn test_improper_colorings_are_rejected_by_every_formulation() {
    let graph = triangle();
    let clash: Coloring = [(1, 1), (2, 1), (3, 2)].into_iter().collect();
    for formulation in Formulation::ALL {
        let built = build(formulation, &graph).unwrap();
        let values = built.encode(&clash.canonical(graph.reference_vertex())).unwrap();
        let violated = built.model().violations(&values, TOL).unwrap();
        assert!(!violated.is_empty(), "{formulation}");
    }
}

#[test]
fn test_assb_rejects_gaps_in_used_colors() {
    let built = build(Formulation::Assb, &path(3)).unwrap();
    // colors 1 and 3 on a path, color 2 unused
    let gap: Coloring = [(1, 1), (2, 3), (3, 1)].into_iter().collect();
    let values = built.encode(&gap).unwrap();
    let violated = built.model().violations(&values, TOL).unwrap();
    assert!(violated.iter().any(|v| v.name.as_deref() == Some("order(3)")));

    // the plain assignment encoding accepts the same vector
    let plain = build(Formulation::As, &path(3)).unwrap();
    let values = plain.encode(&gap).unwrap();
    assert!(plain.model().is_feasible(&values, TOL).unwrap());
}

#[test]
fn test_exhaustive_search_matches_chromatic_number() {
    let cases = [
        (Formulation::As, triangle()),
        (Formulation::As, path(3)),
        (Formulation::Assb, triangle()),
        (Formulation::Assb, path(3)),
        (Formulation::Po, single_edge()),
        (Formulation::Po, Graph::with_vertex_count(3, vec![(2, 3)]).unwrap()),
        (Formulation::Post, single_edge()),
    ];
    for (formulation, graph) in cases {
        let built = build(formulation, &graph).unwrap();
        assert_eq!(
            brute_force_optimum(&built),
            chromatic_number(&graph) as f64,
            "{formulation} on {graph:?}"
        );
    }
}

#[test]
fn test_order_encodings_without_vertex_one() {
    let cases = [
        (Formulation::Po, Graph::new([4, 9], vec![(4, 9)]).unwrap()),
        (Formulation::Post, Graph::new([4, 9], vec![(4, 9)]).unwrap()),
        (Formulation::Po, Graph::new([3, 5, 7], vec![(5, 7)]).unwrap()),
        (Formulation::Post, Graph::new([3, 5, 7], vec![(5, 7)]).unwrap()),
        (
            Formulation::Po,
            Graph::new([2, 6, 8], vec![(2, 6), (6, 8), (2, 8)]).unwrap(),
        ),
    ];
    for (formulation, graph) in cases {
        let built = build(formulation, &graph).unwrap();
        assert_eq!(built.reference_vertex(), graph.vertices().first().copied());
        assert_eq!(
            brute_force_optimum(&built),
            chromatic_number(&graph) as f64,
            "{formulation} on {graph:?}"
        );
    }

    // the isolated reference vertex must still take the largest color
    let built = build(Formulation::Po, &Graph::new([3, 5, 7], vec![(5, 7)]).unwrap()).unwrap();
    let low_reference: Coloring = [(3, 1), (5, 1), (7, 2)].into_iter().collect();
    let values = built.encode(&low_reference).unwrap();
    let violated = built.model().violations(&values, TOL).unwrap();
    assert!(violated.iter().any(|v| v.name.as_deref() == Some("dominance(7,c1)")));
}

#[test]
fn test_encode_rejects_colors_outside_domain() {
    let graph = single_edge();
    let coloring: Coloring = [(1, 1), (2, 5)].into_iter().collect();
    for formulation in Formulation::ALL {
        let built = build(formulation, &graph).unwrap();
        assert_eq!(
            built.encode(&coloring).unwrap_err().code(),
            "FAMILY_INDEX_OUT_OF_RANGE",
            "{formulation}"
        );
    }
    let built = build(Formulation::As, &graph).unwrap();
    let partial: Coloring = [(1, 1)].into_iter().collect();
    assert_eq!(built.encode(&partial).unwrap_err().code(), "COLORING_INVALID");
}

#[test]
fn test_decode_rejects_ambiguous_vertices() {
    let built = build(Formulation::As, &single_edge()).unwrap();
    let values = vec![0.0; built.model().num_variables()];
    let err = built.decode(&values).unwrap_err();
    assert!(err.to_string().contains("vertex 1 decodes to colors []"));
}

#[test]
fn test_build_all_keeps_order() {
    let graph = path(5);
    let built = build_all(&Formulation::ALL, &graph);
    let order: Vec<Formulation> = built
        .iter()
        .map(|result| result.as_ref().unwrap().formulation())
        .collect();
    assert_eq!(order, Formulation::ALL.to_vec());
}
