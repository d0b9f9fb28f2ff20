// src/pipeline/graph.rs

use anyhow::{Result, anyhow};
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

/// The fixed set of pipeline tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskKind {
    Clean,
    Styles,
    Pages,
    Images,
    Fonts,
    Scripts,
    Serve,
}

impl TaskKind {
    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Clean => "clean",
            TaskKind::Styles => "styles",
            TaskKind::Pages => "pages",
            TaskKind::Images => "images",
            TaskKind::Fonts => "fonts",
            TaskKind::Scripts => "scripts",
            TaskKind::Serve => "serve",
        }
    }

    /// The five file-transforming tasks, the unordered parallel group of a
    /// full build.
    pub const TRANSFORMS: [TaskKind; 5] = [
        TaskKind::Styles,
        TaskKind::Pages,
        TaskKind::Images,
        TaskKind::Fonts,
        TaskKind::Scripts,
    ];
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How the pipeline was invoked; decides the shape of the task graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    /// Clean the destination tree, run all transforms, then serve and watch.
    Build,
    /// Run all transforms, then serve and watch (no clean).
    Watch,
    /// Run exactly one task, with no dependencies, and exit when idle
    /// (except for [`TaskKind::Serve`], which blocks).
    Single(TaskKind),
}

/// Directed acyclic dependency graph over [`TaskKind`] nodes.
///
/// Edge direction is dependency -> dependent: for "serve after styles" we
/// add `styles -> serve`. The ordering guarantees of the pipeline (clean
/// before the transforms, the reload server only after every transform has
/// completed) are edges here, not naming conventions.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    graph: DiGraphMap<TaskKind, ()>,
    fatal: Vec<TaskKind>,
}

impl TaskGraph {
    /// Build the task graph for the given invocation mode.
    pub fn for_mode(mode: PipelineMode) -> Self {
        let mut graph = DiGraphMap::new();
        let mut fatal = Vec::new();

        match mode {
            PipelineMode::Build => {
                graph.add_node(TaskKind::Clean);
                graph.add_node(TaskKind::Serve);
                for task in TaskKind::TRANSFORMS {
                    graph.add_edge(TaskKind::Clean, task, ());
                    graph.add_edge(task, TaskKind::Serve, ());
                }
                // A failed clean must halt the whole pipeline, not merely
                // fail its dependents.
                fatal.push(TaskKind::Clean);
            }
            PipelineMode::Watch => {
                graph.add_node(TaskKind::Serve);
                for task in TaskKind::TRANSFORMS {
                    graph.add_edge(task, TaskKind::Serve, ());
                }
            }
            PipelineMode::Single(task) => {
                graph.add_node(task);
            }
        }

        Self { graph, fatal }
    }

    /// All task names in the graph.
    pub fn tasks(&self) -> impl Iterator<Item = TaskKind> + '_ {
        self.graph.nodes()
    }

    pub fn contains(&self, task: TaskKind) -> bool {
        self.graph.contains_node(task)
    }

    /// Immediate dependencies of a task.
    pub fn dependencies_of(&self, task: TaskKind) -> Vec<TaskKind> {
        self.graph
            .neighbors_directed(task, Direction::Incoming)
            .collect()
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, task: TaskKind) -> Vec<TaskKind> {
        self.graph
            .neighbors_directed(task, Direction::Outgoing)
            .collect()
    }

    /// Whether a failure of this task halts the process.
    pub fn is_fatal(&self, task: TaskKind) -> bool {
        self.fatal.contains(&task)
    }

    /// Topological order over the graph.
    ///
    /// Used to seed the initial run in dependency order and to reject any
    /// future graph shape that introduces a cycle.
    pub fn topo_order(&self) -> Result<Vec<TaskKind>> {
        toposort(&self.graph, None)
            .map_err(|cycle| anyhow!("cycle in task graph involving '{}'", cycle.node_id()))
    }
}
