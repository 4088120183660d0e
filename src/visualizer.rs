use std::collections::{BTreeMap, HashSet};

use color_eyre::eyre::{eyre, Result};
use eframe::{run_native, App, CreationContext, NativeOptions};
use egui::Color32;
use egui_graphs::{
    DefaultGraphView, Graph, SettingsInteraction, SettingsNavigation, SettingsStyle,
};
use petgraph::{graph::EdgeIndex, graph::NodeIndex, prelude::StableGraph};
use tracing::info;

use crate::fa::{RunResult, FA};

struct Visualizer {
    graph: Graph,
}

impl Visualizer {
    fn new(_: &CreationContext<'_>, graph: Graph) -> Self {
        Visualizer { graph }
    }
}

impl App for Visualizer {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let navigation_settings = &SettingsNavigation::new()
                .with_zoom_and_pan_enabled(true)
                .with_fit_to_screen_enabled(true);
            let interactive_settings = &SettingsInteraction::new()
                .with_dragging_enabled(true)
                .with_node_clicking_enabled(true)
                .with_node_selection_enabled(true)
                .with_node_selection_multi_enabled(true)
                .with_edge_clicking_enabled(true)
                .with_edge_selection_enabled(true)
                .with_edge_selection_multi_enabled(true);
            let style_settings = &SettingsStyle::default().with_labels_always(true);
            ui.add(
                &mut DefaultGraphView::new(&mut self.graph)
                    .with_styles(style_settings)
                    .with_interactions(interactive_settings)
                    .with_navigations(navigation_settings),
            );
        });
    }
}

/// Edges of the automaton keyed by (source, target), with the symbols taking that edge.
/// Targets without a row are left out since they have no node to point at.
fn collect_edges<T: FA>(fa: &T) -> BTreeMap<(usize, usize), Vec<char>> {
    let num_states = fa.get_num_states();
    let mut edges: BTreeMap<(usize, usize), Vec<char>> = BTreeMap::new();

    for state_idx in 0..num_states {
        for (symbol, target) in fa.get_state_transitions(state_idx) {
            if target < num_states {
                edges.entry((state_idx, target)).or_default().push(symbol);
            }
        }
    }

    edges
}

/// States visited by the run which exist in the automaton
fn visited<T: FA>(fa: &T, run: Option<&RunResult>) -> HashSet<usize> {
    let num_states = fa.get_num_states();
    let path = run.map(|run| run.get_path()).unwrap_or_default();

    path.iter()
        .copied()
        .filter(|state| *state < num_states)
        .collect()
}

fn generate_stable_graph<T: FA>(fa: &T, run: Option<&RunResult>) -> Graph {
    let mut stable_graph = StableGraph::new();

    let num_states = fa.get_num_states();

    let start_node_color = Color32::from_rgb(20, 67, 130);
    let accept_node_color = Color32::from_rgb(20, 130, 90);
    let visited_node_color = Color32::from_rgb(200, 140, 30);

    let edges = collect_edges(fa);
    let visited_states = visited(fa, run);

    // Add all nodes

    for _state_idx in 0..num_states {
        stable_graph.add_node(());
    }

    // Add all edges and remember their index for adding labels later

    let mut edge_map: BTreeMap<(usize, usize), EdgeIndex> = BTreeMap::new();

    for (source, target) in edges.keys() {
        let edge_idx = stable_graph.add_edge(NodeIndex::new(*source), NodeIndex::new(*target), ());
        edge_map.insert((*source, *target), edge_idx);
    }

    let mut graph = Graph::from(&stable_graph);

    for state_idx in 0..num_states {
        let node_label = format!("State {}", state_idx);
        let node = match graph.node_mut(NodeIndex::new(state_idx)) {
            Some(node) => node,
            None => continue,
        };
        node.set_label(node_label);

        // Accepting wins over visited, start wins over both
        if state_idx == fa.get_start_state() {
            node.set_color(start_node_color);
        } else if fa.get_acceptor_states().get(state_idx).is_some_and(|bit| *bit) {
            node.set_color(accept_node_color);
        } else if visited_states.contains(&state_idx) {
            node.set_color(visited_node_color);
        }
    }

    for (key, symbols) in &edges {
        let edge_idx = match edge_map.get(key) {
            Some(edge_idx) => *edge_idx,
            None => continue,
        };
        if let Some(edge) = graph.edge_mut(edge_idx) {
            let edge_label = symbols
                .iter()
                .map(|symbol| symbol.to_string())
                .collect::<Vec<String>>()
                .join(", ");
            edge.set_label(edge_label);
        }
    }

    graph
}

/// Visualizes the finite automaton, highlighting the states visited by the run if one is
/// provided
pub fn visualize<T: FA>(fa: &T, run: Option<&RunResult>) -> Result<()> {
    let graph = generate_stable_graph(fa, run);
    info!("Opening the automaton visualizer");
    run_native(
        "finite automaton visualizer",
        NativeOptions::default(),
        Box::new(|cc| Ok(Box::new(Visualizer::new(cc, graph)))),
    )
    .map_err(|error| eyre!("Error: Failed to open the visualizer: {}", error))
}
