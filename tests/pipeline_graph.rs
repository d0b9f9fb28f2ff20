use std::error::Error;

use sitepipe::pipeline::{PipelineMode, TaskGraph, TaskKind};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn build_graph_orders_clean_before_transforms_before_serve() -> TestResult {
    let graph = TaskGraph::for_mode(PipelineMode::Build);

    for task in TaskKind::TRANSFORMS {
        assert_eq!(graph.dependencies_of(task), vec![TaskKind::Clean]);
    }

    let mut serve_deps = graph.dependencies_of(TaskKind::Serve);
    serve_deps.sort();
    let mut transforms = TaskKind::TRANSFORMS.to_vec();
    transforms.sort();
    assert_eq!(serve_deps, transforms);

    assert!(graph.is_fatal(TaskKind::Clean));
    assert!(!graph.is_fatal(TaskKind::Styles));

    let order = graph.topo_order()?;
    let pos = |task: TaskKind| order.iter().position(|t| *t == task).unwrap();
    assert!(pos(TaskKind::Clean) < pos(TaskKind::Styles));
    assert!(pos(TaskKind::Styles) < pos(TaskKind::Serve));
    assert!(pos(TaskKind::Scripts) < pos(TaskKind::Serve));

    Ok(())
}

#[test]
fn watch_graph_has_no_clean_and_free_transform_roots() -> TestResult {
    let graph = TaskGraph::for_mode(PipelineMode::Watch);

    assert!(!graph.contains(TaskKind::Clean));
    for task in TaskKind::TRANSFORMS {
        assert!(graph.dependencies_of(task).is_empty());
    }
    assert_eq!(graph.dependencies_of(TaskKind::Serve).len(), 5);

    Ok(())
}

#[test]
fn single_graph_contains_only_the_named_task() -> TestResult {
    let graph = TaskGraph::for_mode(PipelineMode::Single(TaskKind::Pages));

    assert_eq!(graph.topo_order()?, vec![TaskKind::Pages]);
    assert!(graph.dependencies_of(TaskKind::Pages).is_empty());
    assert!(!graph.contains(TaskKind::Serve));

    Ok(())
}
