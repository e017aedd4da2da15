// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the viewer, viewport sync, stroke engine, overlay, and
//! floating widgets together inside eframe's update loop. Each frame applies
//! pointer input first, then lets the viewport sync recompute and replay
//! strokes, and only then paints, so the overlay never lags the image.

use crate::config::AppConfig;
use crate::engine::{StrokeEngine, StrokeOutcome};
use crate::io::media::{self, DisplayImage};
use crate::io::submission::{self, DirectorySink};
use crate::io::{export, serialization};
use crate::minimap::MinimapRenderer;
use crate::models::annotation::StrokeStyle;
use crate::models::project::ProjectData;
use crate::models::space::{ImageDimensions, ImagePoint, Rect, Size};
use crate::render::{PixmapSurface, Surface};
use crate::sync::{FrameHandle, FrameScheduler, LoadGuard, LoadStatus, Subscription, ViewportSync};
use crate::ui::canvas::{self, CanvasAction, CanvasFrame};
use crate::ui::navigator::{self, NavigatorAction};
use crate::ui::toolbar::{self, HistoryState, ToolbarAction};
use crate::ui::{floating, minimap as minimap_ui};
use crate::util::geometry;
use crate::viewer::{FlatViewer, Viewer};
use crate::widgets::{store, Anchor, MemoryStore, PositionStore, WidgetLayout, WidgetSpec};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::{Duration, Instant};

const TOOLBOX_ID: &str = "toolbox";
const MINIMAP_ID: &str = "minimap";
const NAVIGATOR_ID: &str = "navigator";
const TOOLBOX_SIZE: Size = Size {
    width: 260.0,
    height: 236.0,
};
const NAVIGATOR_SIZE: Size = Size {
    width: 180.0,
    height: 64.0,
};

/// Repaint interval that keeps the minimap marker pulsing.
const PULSE_REPAINT: Duration = Duration::from_millis(33);

/// Files named on the command line.
#[derive(Debug, Default)]
pub struct LaunchOptions {
    pub image: Option<PathBuf>,
    pub annotations: Option<PathBuf>,
}

/// Animation frames map onto egui repaints.
struct EguiScheduler {
    ctx: egui::Context,
    next: u64,
}

impl FrameScheduler for EguiScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.ctx.request_repaint();
        FrameHandle(self.next)
    }

    // A requested repaint cannot be withdrawn; the handle just goes stale.
    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

/// Result of background image loading operation.
struct LoadedImageData {
    path: PathBuf,
    image: DisplayImage,
}

/// Main application state.
pub struct DeepinkApp {
    config: AppConfig,

    viewer: FlatViewer,
    sync: ViewportSync,
    scheduler: EguiScheduler,

    /// Set by the viewport listener; cleared once strokes are replayed
    needs_replay: Rc<Cell<bool>>,
    _replay_listener: Subscription,

    engine: StrokeEngine,
    brush: StrokeStyle,
    overlay: PixmapSurface,
    overlay_texture: Option<egui::TextureHandle>,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,
    image_id: Option<String>,

    /// Project loaded before its image finished opening
    pending_project: Option<ProjectData>,

    layout: WidgetLayout,
    positions: MemoryStore,
    minimap: MinimapRenderer,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImageData, String>>>,
    load_guard: LoadGuard,
    loading_message: Option<String>,

    launch: Option<LaunchOptions>,
    status: Option<String>,
    /// The last submission failed and can be retried
    submit_failed: bool,
    started: Instant,
    last_frame: Instant,
}

impl DeepinkApp {
    /// Create the application, restoring widget positions from eframe storage.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, launch: LaunchOptions) -> Self {
        let mut viewer = FlatViewer::new(Size::new(0.0, 0.0));
        let sync = ViewportSync::attach(&mut viewer);

        let needs_replay = Rc::new(Cell::new(true));
        let flag = needs_replay.clone();
        let replay_listener = sync.subscribe(move |_| flag.set(true));

        let mut positions = MemoryStore::new();
        if let Some(storage) = cc.storage {
            for id in [TOOLBOX_ID, MINIMAP_ID, NAVIGATOR_ID] {
                let key = store::position_key(id);
                if let Some(value) = storage.get_string(&key) {
                    positions.set(&key, value);
                }
            }
        }

        let now = Instant::now();
        Self {
            brush: config.default_brush,
            layout: WidgetLayout::new(Size::new(0.0, 0.0), config.widget_bounds),
            load_guard: LoadGuard::new(config.load_timeout()),
            config,
            viewer,
            sync,
            scheduler: EguiScheduler {
                ctx: cc.egui_ctx.clone(),
                next: 0,
            },
            needs_replay,
            _replay_listener: replay_listener,
            engine: StrokeEngine::new(),
            overlay: PixmapSurface::new(Size::new(0.0, 0.0)),
            overlay_texture: None,
            image_texture: None,
            image_id: None,
            pending_project: None,
            positions,
            minimap: MinimapRenderer::default(),
            image_loader: None,
            loading_message: None,
            launch: Some(launch),
            status: None,
            submit_failed: false,
            started: now,
            last_frame: now,
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Load an image file and create a texture for display (asynchronously).
    pub fn load_image_file(&mut self, path: PathBuf, ctx: &egui::Context) {
        let max_side = ctx.input(|i| i.max_texture_side) as u32;
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.load_guard.start(Instant::now());
        self.loading_message = Some(format!("Loading {}...", path.display()));

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = media::load_display_image(&path, max_side)
                .map(|image| LoadedImageData { path, image })
                .map_err(|e| format!("{e:#}"));
            let _ = sender.send(result);
        });
    }

    /// Check for a finished load and drop the indicator if it overstays.
    fn poll_loader(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        match receiver.try_recv() {
            Ok(Ok(loaded)) => {
                self.image_loader = None;
                self.open_loaded_image(ctx, loaded);
            }
            Ok(Err(e)) => {
                self.image_loader = None;
                self.load_guard.finish();
                self.loading_message = None;
                log::error!("Failed to load image: {}", e);
                self.set_status(format!("Failed to load image: {e}"));
            }
            Err(TryRecvError::Disconnected) => {
                self.image_loader = None;
                self.load_guard.finish();
                self.loading_message = None;
            }
            Err(TryRecvError::Empty) => {
                if self.load_guard.poll(Instant::now()) == LoadStatus::TimedOut && self.loading_message.is_some() {
                    self.loading_message = None;
                    self.set_status("Image is taking longer than expected; it will appear when ready");
                }
                ctx.request_repaint_after(Duration::from_millis(100));
            }
        }
    }

    fn open_loaded_image(&mut self, ctx: &egui::Context, loaded: LoadedImageData) {
        let DisplayImage { dims, preview } = loaded.image;
        let size = [preview.width as usize, preview.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &preview.pixels);
        self.image_texture = Some(ctx.load_texture("loaded_image", color_image, egui::TextureOptions::LINEAR));

        let image_id = media::image_id(&loaded.path);
        let strokes = match self.pending_project.take() {
            Some(project) => {
                check_project_matches(&project, &image_id, dims);
                project.strokes
            }
            None => Vec::new(),
        };
        self.engine.load_strokes(strokes);
        self.image_id = Some(image_id);
        self.submit_failed = false;

        self.viewer.open(dims);
        self.load_guard.finish();
        self.loading_message = None;
        self.status = None;
        log::info!("Image loaded: {} ({}x{})", loaded.path.display(), dims.width, dims.height);
    }

    /// Load an annotation project. If no image is open yet, the strokes wait for one.
    fn load_project_file(&mut self, path: &Path, ctx: &egui::Context, open_referenced_image: bool) {
        let project = match serialization::load_project(path) {
            Ok(project) => project,
            Err(e) => {
                log::error!("{e:#}");
                self.set_status(format!("{e:#}"));
                return;
            }
        };
        log::info!("Imported {} stroke(s) from {}", project.strokes.len(), path.display());

        let open_image = self
            .image_id
            .clone()
            .zip(self.viewer.image_dimensions())
            .filter(|_| self.image_loader.is_none());
        match open_image {
            Some((image_id, dims)) => {
                check_project_matches(&project, &image_id, dims);
                self.engine.load_strokes(project.strokes);
                self.submit_failed = false;
                self.sync.request_refresh(&mut self.scheduler);
            }
            None => {
                let referenced = path.parent().map(|dir| dir.join(&project.image_id));
                self.pending_project = Some(project);
                if let Some(image_path) = referenced.filter(|p| open_referenced_image && p.exists()) {
                    self.load_image_file(image_path, ctx);
                }
            }
        }
    }

    fn save_project_file(&mut self, path: &Path) {
        let (Some(image_id), Some(dims)) = (&self.image_id, self.viewer.image_dimensions()) else {
            return;
        };
        let mut project = ProjectData::new(image_id.clone(), dims);
        project.strokes = self.engine.strokes().to_vec();
        match serialization::save_project(&project, path) {
            Ok(()) => {
                log::info!("Saved {} stroke(s) to {}", project.strokes.len(), path.display());
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("{e:#}");
                self.set_status(format!("{e:#}"));
            }
        }
    }

    fn export_features_file(&mut self, path: &Path) {
        let Some(dims) = self.viewer.image_dimensions() else {
            return;
        };
        let result = export::export_features(self.engine.strokes(), dims, self.config.author.as_deref(), path);
        match result {
            Ok(()) => self.set_status(format!("Exported features to {}", path.display())),
            Err(e) => {
                log::error!("Failed to export features: {e:#}");
                self.set_status(format!("Failed to export features: {e:#}"));
            }
        }
    }

    fn submit_strokes(&mut self) {
        let Some(image_id) = self.image_id.clone() else {
            return;
        };
        let mut sink = DirectorySink::new(self.config.submission_dir.clone());
        let report = submission::submit_pending(&mut self.engine, &mut sink, &image_id, self.config.author.as_deref());
        self.submit_failed = report.error.is_some();
        let message = match report.error {
            Some(e) => format!("Submission failed ({} stroke(s) pending): {e}", report.remaining),
            None => format!("Submitted {} stroke(s)", report.submitted),
        };
        self.set_status(message);
    }

    fn undo(&mut self) {
        if self.engine.undo() {
            log::info!("Undo");
            self.sync.request_refresh(&mut self.scheduler);
        }
    }

    fn redo(&mut self) {
        if self.engine.redo() {
            log::info!("Redo");
            self.sync.request_refresh(&mut self.scheduler);
        }
    }

    fn clear_strokes(&mut self) {
        self.engine.clear();
        self.sync.request_refresh(&mut self.scheduler);
    }

    fn zoom_step(&mut self, zoom_in: bool) {
        let factor = if zoom_in {
            self.config.zoom_step
        } else {
            1.0 / self.config.zoom_step
        };
        let anchor = self.viewer.center();
        self.viewer.zoom_by(factor, anchor);
    }

    /// Track the canvas size and place the floating widgets once it is known.
    fn on_canvas_resize(&mut self, size: Size) {
        if !size.is_drawable() {
            return;
        }
        self.viewer.resize(size);
        self.layout.on_container_resize(size);
        if self.layout.widgets().is_empty() {
            self.layout
                .mount(WidgetSpec::new(TOOLBOX_ID, TOOLBOX_SIZE, Anchor::TopLeft), &self.positions);
            let minimap_size = Size::new(self.config.minimap_width, self.config.minimap_height);
            let mut minimap = WidgetSpec::new(MINIMAP_ID, minimap_size, Anchor::TopRight);
            minimap.size.height += minimap.handle_height;
            self.layout.mount(minimap, &self.positions);
            self.layout
                .mount(WidgetSpec::new(NAVIGATOR_ID, NAVIGATOR_SIZE, Anchor::BottomRight), &self.positions);
        }
    }

    fn apply_canvas_action(&mut self, action: CanvasAction) {
        match action {
            CanvasAction::BeginStroke(point) => {
                self.engine.begin_stroke(&self.viewer, point, self.brush);
            }
            CanvasAction::ExtendStroke(point) => {
                self.engine.extend_stroke(&self.viewer, point, &mut self.overlay);
            }
            CanvasAction::EndStroke => {
                if let StrokeOutcome::Discarded = self.engine.end_stroke() {
                    // Remove the lone dot drawn while capturing.
                    self.sync.request_refresh(&mut self.scheduler);
                }
            }
            CanvasAction::Pan { dx, dy } => self.viewer.pan_by_screen(dx, dy),
            CanvasAction::Zoom { factor, anchor } => {
                let anchor = self.viewer.screen_to_viewport(anchor);
                self.viewer.zoom_by(factor, anchor);
            }
            CanvasAction::None => {}
        }
    }

    /// Step animation, recompute the viewport, and replay strokes if it moved.
    fn advance(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        if self.viewer.update(dt) {
            ctx.request_repaint();
        }

        self.sync.pump(&mut self.scheduler);
        if let Some(handle) = self.sync.pending_frame() {
            self.sync.run_frame(handle, &self.viewer);
        }

        if self.needs_replay.replace(false) {
            if let Some(size) = self.viewer.container_size() {
                self.overlay.resize(size);
            }
            self.overlay.clear();
            self.engine.replay(&self.viewer, &mut self.overlay);
        }
    }

    fn paint_canvas(&mut self, ctx: &egui::Context, frame: &CanvasFrame) {
        // Nothing is drawn until the viewer has reported the image as open.
        let Some(dims) = self.viewer.image_dimensions().filter(|_| self.sync.is_ready()) else {
            canvas::paint_placeholder(frame);
            return;
        };

        if let Some(texture) = &self.image_texture {
            let top_left = geometry::image_px_to_screen(&self.viewer, ImagePoint::new(0.0, 0.0));
            let bottom_right = geometry::image_px_to_screen(
                &self.viewer,
                ImagePoint::new(dims.width as f64, dims.height as f64),
            );
            if let (Some(a), Some(b)) = (top_left, bottom_right) {
                canvas::paint_image(frame, texture, Rect::new(a.x, a.y, b.x - a.x, b.y - a.y));
            }
        }

        if self.overlay.take_dirty() {
            if let Some((w, h)) = self.overlay.size_px() {
                let image = egui::ColorImage::from_rgba_premultiplied([w as usize, h as usize], self.overlay.data());
                match &mut self.overlay_texture {
                    Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                    None => {
                        self.overlay_texture =
                            Some(ctx.load_texture("stroke_overlay", image, egui::TextureOptions::LINEAR));
                    }
                }
            }
        }
        if let Some(texture) = &self.overlay_texture {
            canvas::paint_overlay(frame, texture);
        }
    }

    /// Draw the floating panels and apply whatever the user did with them.
    fn show_widgets(&mut self, ui: &mut egui::Ui, frame: &CanvasFrame) {
        let mut panels = Vec::new();
        for widget in self.layout.widgets() {
            let title = match widget.id() {
                TOOLBOX_ID => "Tools",
                MINIMAP_ID => "Overview",
                _ => "Zoom",
            };
            panels.push((widget.id().to_string(), floating::panel(ui, frame, widget, title)));
        }

        for (_, panel) in &panels {
            let handle = &panel.handle;
            if handle.drag_started() {
                let origin = ui.input(|i| i.pointer.press_origin()).or(handle.interact_pointer_pos());
                if let Some(pos) = origin {
                    self.layout.on_pointer_down(frame.to_local(pos));
                }
            } else if handle.drag_stopped() {
                self.layout.on_pointer_up(&mut self.positions);
            } else if handle.dragged() {
                if let Some(pos) = handle.interact_pointer_pos() {
                    self.layout.on_pointer_move(frame.to_local(pos));
                }
            }
        }

        for (id, panel) in panels {
            match id.as_str() {
                TOOLBOX_ID => self.show_toolbox(ui, panel.body),
                MINIMAP_ID => self.show_minimap(ui, panel.body),
                _ => match navigator::show(ui, panel.body, self.sync.current().map(|s| s.zoom)) {
                    NavigatorAction::ZoomIn => self.zoom_step(true),
                    NavigatorAction::ZoomOut => self.zoom_step(false),
                    NavigatorAction::Home => self.viewer.go_home(false),
                    NavigatorAction::None => {}
                },
            }
        }
    }

    fn show_toolbox(&mut self, ui: &mut egui::Ui, body: egui::Rect) {
        let history = HistoryState {
            can_undo: self.engine.can_undo(),
            can_redo: self.engine.can_redo(),
            has_strokes: !self.engine.strokes().is_empty(),
        };
        let mut tool = self.engine.tool();
        let action = ui
            .allocate_ui_at_rect(body.shrink(8.0), |ui| toolbar::show(ui, &mut tool, &mut self.brush, history))
            .inner;

        if tool != self.engine.tool() {
            let was_capturing = self.engine.is_capturing();
            self.engine.set_tool(tool);
            if was_capturing {
                self.sync.request_refresh(&mut self.scheduler);
            }
        }
        match action {
            ToolbarAction::Undo => self.undo(),
            ToolbarAction::Redo => self.redo(),
            ToolbarAction::Clear => self.clear_strokes(),
            ToolbarAction::None => {}
        }
    }

    fn show_minimap(&mut self, ui: &mut egui::Ui, body: egui::Rect) {
        let (Some(state), Some(dims)) = (self.sync.current(), self.viewer.image_dimensions()) else {
            return;
        };
        let canvas_size = Size::new(body.width() as f64, body.height() as f64);
        let elapsed = self.started.elapsed().as_secs_f64();
        let commands = self.minimap.render(&state, dims, canvas_size, elapsed);
        if let Some((x, y)) = minimap_ui::show(ui, body, &commands) {
            self.minimap.handle_click(&mut self.viewer, &state, canvas_size, x, y);
        }
        ui.ctx().request_repaint_after(PULSE_REPAINT);
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let has_image = self.viewer.image_dimensions().is_some();
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Image...").clicked() {
                    // Open native file picker
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif"])
                        .pick_file()
                    {
                        self.load_image_file(path, ctx);
                    }
                    ui.close_menu();
                }
                if ui.button("Load Annotations...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Annotations", &["yaml", "yml", "json"])
                        .pick_file()
                    {
                        self.load_project_file(&path, ctx, true);
                    }
                    ui.close_menu();
                }
                if ui.add_enabled(has_image, egui::Button::new("Save Annotations...")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON", &["json"])
                        .add_filter("YAML", &["yaml", "yml"])
                        .set_file_name("annotations.json")
                        .save_file()
                    {
                        self.save_project_file(&path);
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(has_image, egui::Button::new("Export Features...")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("GeoJSON", &["geojson", "json"])
                        .set_file_name("strokes.geojson")
                        .save_file()
                    {
                        self.export_features_file(&path);
                    }
                    ui.close_menu();
                }
                let pending = self.engine.pending_submission().len();
                if ui
                    .add_enabled(has_image && pending > 0, egui::Button::new(format!("Submit Strokes ({pending})")))
                    .clicked()
                {
                    self.submit_strokes();
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui.add_enabled(self.engine.can_undo(), egui::Button::new("Undo (Ctrl+Z)")).clicked() {
                    self.undo();
                    ui.close_menu();
                }
                if ui
                    .add_enabled(self.engine.can_redo(), egui::Button::new("Redo (Ctrl+Shift+Z)"))
                    .clicked()
                {
                    self.redo();
                    ui.close_menu();
                }
                ui.separator();
                let has_strokes = !self.engine.strokes().is_empty();
                if ui.add_enabled(has_strokes, egui::Button::new("Clear All Strokes")).clicked() {
                    self.clear_strokes();
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.add_enabled(has_image, egui::Button::new("Zoom In")).clicked() {
                    self.zoom_step(true);
                    ui.close_menu();
                }
                if ui.add_enabled(has_image, egui::Button::new("Zoom Out")).clicked() {
                    self.zoom_step(false);
                    ui.close_menu();
                }
                if ui.add_enabled(has_image, egui::Button::new("Show Whole Image")).clicked() {
                    self.viewer.go_home(false);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Reset Panel Layout").clicked() {
                    self.layout.emergency_reset(&mut self.positions);
                    ui.close_menu();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    self.set_status(format!("deepink {}", env!("CARGO_PKG_VERSION")));
                    ui.close_menu();
                }
            });
        });
    }

    fn status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(message) = &self.status {
                ui.label(message.as_str());
            }
            if self.submit_failed && ui.button("Retry").clicked() {
                self.submit_strokes();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(state) = self.sync.current() {
                    ui.monospace(format!(
                        "center ({:.4}, {:.4})  zoom {:.2}",
                        state.center.x, state.center.y, state.zoom
                    ));
                    ui.separator();
                }
                ui.label(format!(
                    "{} stroke(s), {} unsubmitted",
                    self.engine.strokes().len(),
                    self.engine.pending_submission().len()
                ));
            });
        });
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && self.engine.is_capturing() {
            self.engine.cancel_stroke();
            self.sync.request_refresh(&mut self.scheduler);
        }

        // Only process if no text field is focused
        if ctx.wants_keyboard_input() {
            return;
        }

        // Handle undo (Ctrl+Z)
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
            self.undo();
        }

        // Handle redo (Ctrl+Shift+Z or Ctrl+Y)
        if ctx.input(|i| {
            (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        }) {
            self.redo();
        }
    }

    fn start_launch(&mut self, ctx: &egui::Context) {
        let Some(launch) = self.launch.take() else {
            return;
        };
        if let Some(path) = &launch.annotations {
            self.load_project_file(path, ctx, launch.image.is_none());
        }
        if let Some(path) = launch.image {
            self.load_image_file(path, ctx);
        }
    }
}

/// Warn when a project was made for a different image.
///
/// Strokes still load: normalized points line up on any rendition of the same image.
fn check_project_matches(project: &ProjectData, image_id: &str, dims: ImageDimensions) {
    if project.image_id != image_id {
        log::warn!("Annotations were made for {}, applying to {}", project.image_id, image_id);
    }
    if project.dimensions() != Some(dims) {
        log::warn!(
            "Annotations were made at {}x{}, image is {}x{}",
            project.image_width,
            project.image_height,
            dims.width,
            dims.height
        );
    }
}

impl eframe::App for DeepinkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.start_launch(ctx);
        self.poll_loader(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ctx, ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        self.handle_keyboard(ctx);

        // Main canvas (center)
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(message) = &self.loading_message {
                    canvas::show_loading(ui, message);
                    return;
                }
                let frame = canvas::interact(ui, self.engine.tool(), self.config.zoom_step);
                self.on_canvas_resize(frame.size());
                self.apply_canvas_action(frame.action);
                self.advance(ctx);
                self.paint_canvas(ctx, &frame);
                if self.sync.is_ready() {
                    self.show_widgets(ui, &frame);
                }
            });

        // Viewer commands issued after the canvas ran are picked up next frame.
        self.sync.pump(&mut self.scheduler);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        for (key, value) in self.positions.entries() {
            storage.set_string(key, value.to_string());
        }
    }
}
