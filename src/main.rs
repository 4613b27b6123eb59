mod context;
mod editor;
mod graph;
mod ids;
mod layout;
mod magic;
mod node;
mod phrases;
mod settings;
mod viewport;

use chrono::Local;
use editor::FlowEditor;
use eframe::egui;
use graph::FlowGraph;
use magic::MagicRequest;
use node::CustomAddNodesOptions;
use settings::AppSettings;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::init();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Flow Canvas",
        native_options,
        Box::new(|_cc| Ok(Box::new(FlowApp::default()))),
    )
}

struct FlowApp {
    graph: FlowGraph,
    editor: FlowEditor,
    settings: AppSettings,
    settings_path: PathBuf,
    logs: Vec<String>,
    show_style_window: bool,
}

impl Default for FlowApp {
    fn default() -> Self {
        let settings_path = settings::default_settings_path();
        let settings = AppSettings::load_or_default(&settings_path);
        let mut app = Self {
            graph: FlowGraph::new(),
            editor: FlowEditor::default(),
            settings,
            settings_path,
            logs: Vec::new(),
            show_style_window: false,
        };
        app.apply_settings();
        app.add_starter_nodes();
        app
    }
}

impl FlowApp {
    fn log(&mut self, message: impl AsRef<str>) {
        self.logs
            .push(format!("[{}] {}", Local::now().format("%H:%M:%S"), message.as_ref()));
    }

    fn apply_settings(&mut self) {
        self.editor.style = self.settings.style.clone();
        self.editor.default_background = self.settings.default_background;
    }

    fn add_node_options(&self) -> CustomAddNodesOptions {
        CustomAddNodesOptions {
            label: None,
            select: true,
            editing: false,
            style_background: self.settings.default_background,
            fit_view: Some(self.settings.fit_view),
            to_fit_view: self.settings.fit_view_on_add,
        }
    }

    fn add_starter_nodes(&mut self) {
        let defaults = self.add_node_options();
        let first = node::custom_add_nodes(
            &mut self.graph,
            &mut self.editor.post_layout,
            egui::Pos2::new(0.0, 0.0),
            CustomAddNodesOptions {
                label: Some("Start here".into()),
                ..defaults.clone()
            },
        );
        let second = node::custom_add_nodes(
            &mut self.graph,
            &mut self.editor.post_layout,
            egui::Pos2::new(-360.0, 0.0),
            CustomAddNodesOptions {
                label: Some("Double-click the canvas to add a node".into()),
                select: false,
                ..defaults
            },
        );
        self.graph.connect(
            &first.source_handle_id,
            &second.target_handle_id,
            ids::edge_id(),
        );
        self.editor.fit_view(self.settings.fit_view);
    }

    fn describe(request: &MagicRequest) -> String {
        match request {
            MagicRequest::Tagging { target_id, label } => {
                format!("[Magic] Tag suggestion requested for {} ({:?})", target_id, label)
            }
            MagicRequest::SuggestLabel {
                target_id,
                node_label_and_tags,
                ..
            } => format!(
                "[Magic] Label suggestion requested for {} with {} node(s) of context",
                target_id,
                node_label_and_tags.len()
            ),
        }
    }

    fn style_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_style_window;
        let mut save = false;
        let mut reset = false;
        egui::Window::new("Style")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                let settings = &mut self.settings;
                ui.horizontal(|ui| {
                    ui.label("Font Size:");
                    ui.add(egui::Slider::new(&mut settings.style.font_size, 8.0..=24.0).suffix("px"));
                });
                ui.horizontal(|ui| {
                    ui.color_edit_button_srgba(&mut settings.default_background);
                    ui.label("New node background");
                });
                ui.separator();
                ui.label("Canvas Colors");
                let colors = [
                    ("Canvas", &mut settings.style.canvas_background),
                    ("Selection", &mut settings.style.selected_stroke),
                    ("Connection target", &mut settings.style.target_highlight),
                    ("Explained", &mut settings.style.explained_highlight),
                    ("Edges", &mut settings.style.edge),
                    ("Tags", &mut settings.style.tag_background),
                ];
                for (name, color) in colors {
                    ui.horizontal(|ui| {
                        ui.color_edit_button_srgba(color);
                        ui.label(name);
                    });
                }
                ui.separator();
                ui.checkbox(&mut settings.fit_view_on_add, "Fit view after adding a node");
                ui.horizontal(|ui| {
                    ui.label("Fit padding:");
                    ui.add(egui::Slider::new(&mut settings.fit_view.padding, 0.0..=0.4));
                });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("💾 Save").clicked() {
                        save = true;
                    }
                    if ui.button("Reset").clicked() {
                        reset = true;
                    }
                });
            });
        self.show_style_window = open;

        if reset {
            self.settings = AppSettings::default();
        }
        self.apply_settings();
        if save {
            match self.settings.save_to(&self.settings_path) {
                Ok(()) => self.log("[System] Settings saved."),
                Err(e) => {
                    log::error!("Failed to save settings: {:#}", e);
                    self.log(format!("[System] Failed to save settings: {:#}", e));
                }
            }
        }
    }
}

impl eframe::App for FlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Flow Canvas");
                ui.separator();
                if ui.button("➕ Node").clicked() {
                    let options = self.add_node_options();
                    let added = self.editor.add_node_at_center(&mut self.graph, options);
                    self.log(format!("[Graph] Added {}", added.node_id));
                }
                if ui.button("Fit View").clicked() {
                    self.editor.fit_view(self.settings.fit_view);
                }
                let has_selection = !self.graph.selected_components().nodes.is_empty();
                if ui
                    .add_enabled(has_selection, egui::Button::new("✨ Explain Selection"))
                    .clicked()
                {
                    if let Some(id) = self.editor.explain_selection(&mut self.graph) {
                        self.log(format!("[Magic] Explanation node {} created", id));
                    }
                }
                ui.separator();
                if ui.button("Style").clicked() {
                    self.show_style_window = !self.show_style_window;
                }
                ui.separator();
                ui.label(format!("{:.0}%", self.editor.viewport.zoom * 100.0));
                ui.label(format!(
                    "{} nodes, {} edges",
                    self.graph.nodes.len(),
                    self.graph.edges.len()
                ));
            });
        });

        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Activity");
                    if ui.button("Clear").clicked() {
                        self.logs.clear();
                    }
                });
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.logs {
                            ui.monospace(line);
                        }
                    });
            });

        if self.show_style_window {
            self.style_window(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.editor.show(ui, &mut self.graph);
            });

        for request in self.editor.take_magic_requests() {
            log::info!("Magic request for {}: {:?}", request.target_id(), request);
            self.log(Self::describe(&request));
        }
    }
}
