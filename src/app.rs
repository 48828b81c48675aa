//! Main application state and UI coordination

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;

use crate::backend::local::{LocalBackend, LocalIdentity};
use crate::backend::{BackendError, DocumentStore};
use crate::core::config::AppConfig;
use crate::core::post::{sort_newest_first, Post, PostBody};
use crate::core::publish::{Draft, PublishError, Publisher};
use crate::core::session::{SessionContext, Subscription};
use crate::tasks::{Pending, TaskStatus};
use crate::ui::block_editor::{BlockEditor, EditorOutcome};
use crate::ui::block_renderer::render_blocks;
use crate::ui::code_editor::CodeComposer;
use crate::ui::feed::{FeedPage, FeedView};
use crate::ui::post_view::PostView;
use crate::ui::profile::ProfilePage;
use crate::ui::sidebar::Sidebar;
use crate::ui::sign_in::{DialogState, SignInDialog};
use crate::ui::thumbnail::ThumbnailCapture;
use crate::ui::Route;

/// Width of the preview rendered for thumbnails
const THUMBNAIL_WIDTH: f32 = 480.0;

/// The page in the central panel
enum Page {
    Feed,
    ComposeCode(CodeComposer),
    ComposeBlocks(BlockEditor),
    Post {
        id: String,
        post: Option<Post>,
        error: Option<String>,
        loading: Option<Pending<Result<Post, BackendError>>>,
    },
    Profile(String),
}

/// Where a publish currently stands
enum PublishStage {
    Idle,
    /// Block preview drawn in the overlay, waiting for the screenshot
    Capturing {
        draft: Draft,
        capture: ThumbnailCapture,
    },
    Saving(Pending<Result<Post, PublishError>>),
}

/// Main application state
pub struct ScriptShotApp {
    /// Application configuration
    config: AppConfig,
    /// Signed-in user, shared with the pages
    session: SessionContext,
    /// Repaints whenever the identity changes
    _session_repaint: Subscription,
    store: Arc<dyn DocumentStore>,
    publisher: Publisher,
    /// Runs backend calls off the UI thread
    runtime: tokio::runtime::Runtime,
    /// Feed posts, newest first
    posts: Vec<Post>,
    feed_loading: Option<Pending<Result<Vec<Post>, BackendError>>>,
    feed_error: Option<String>,
    feed_page: FeedPage,
    page: Page,
    publish: PublishStage,
    sign_in: Option<SignInDialog>,
    /// Message of the last failed action
    alert: Option<String>,
    /// Whether sidebar is visible
    sidebar_visible: bool,
}

fn visuals(dark: bool) -> egui::Visuals {
    if dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    }
}

impl ScriptShotApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let config = AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Using default config: {:#}", e);
            AppConfig::default()
        });
        cc.egui_ctx.set_visuals(visuals(config.dark_mode()));

        let data_dir = config.data_dir();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data dir: {}", data_dir.display()))?;
        tracing::info!("Data directory: {}", data_dir.display());

        let backend = Arc::new(LocalBackend::new(data_dir.clone()));
        let session = SessionContext::new(Arc::new(LocalIdentity::open(&data_dir)));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("scriptshot-worker")
            .build()
            .context("Failed to start background runtime")?;

        let ctx = cc.egui_ctx.clone();
        let session_repaint = session.subscribe(move |_| ctx.request_repaint());

        let mut app = Self {
            config,
            session,
            _session_repaint: session_repaint,
            store: backend.clone(),
            publisher: Publisher::new(backend.clone(), backend),
            runtime,
            posts: Vec::new(),
            feed_loading: None,
            feed_error: None,
            feed_page: FeedPage::default(),
            page: Page::Feed,
            publish: PublishStage::Idle,
            sign_in: None,
            alert: None,
            sidebar_visible: true,
        };
        app.refresh_feed(&cc.egui_ctx);
        Ok(app)
    }

    /// Reload every post from the store in the background
    fn refresh_feed(&mut self, ctx: &egui::Context) {
        let store = self.store.clone();
        let ctx = ctx.clone();
        self.feed_error = None;
        self.feed_loading = Some(Pending::spawn(
            self.runtime.handle(),
            move || -> Result<Vec<Post>, BackendError> {
                let mut posts = store.list_posts()?;
                sort_newest_first(&mut posts);
                Ok(posts)
            },
            move || ctx.request_repaint(),
        ));
    }

    fn open_post(&mut self, id: String, ctx: &egui::Context) {
        let cached = self.posts.iter().find(|p| p.id == id).cloned();
        let loading = if cached.is_none() {
            let store = self.store.clone();
            let ctx = ctx.clone();
            let post_id = id.clone();
            Some(Pending::spawn(
                self.runtime.handle(),
                move || -> Result<Post, BackendError> {
                    store
                        .get_post(&post_id)?
                        .ok_or(BackendError::NotFound(post_id))
                },
                move || ctx.request_repaint(),
            ))
        } else {
            None
        };
        self.page = Page::Post {
            id,
            post: cached,
            error: None,
            loading,
        };
    }

    fn navigate(&mut self, route: Route, ctx: &egui::Context) {
        match route {
            Route::Feed => {
                self.page = Page::Feed;
                self.refresh_feed(ctx);
            }
            Route::ComposeCode => {
                if !matches!(self.page, Page::ComposeCode(_)) {
                    self.page = Page::ComposeCode(CodeComposer::new(&self.session, ctx));
                }
            }
            Route::ComposeBlocks => {
                if !matches!(self.page, Page::ComposeBlocks(_)) {
                    self.page = Page::ComposeBlocks(BlockEditor::new(&self.session, ctx));
                }
            }
            Route::Post(id) => self.open_post(id, ctx),
            Route::Profile(user_id) => self.page = Page::Profile(user_id),
            Route::SignIn => self.sign_in = Some(SignInDialog::default()),
            Route::SignOut => {
                if let Err(e) = self.session.sign_out() {
                    tracing::error!("Failed to sign out: {}", e);
                    self.alert = Some(format!("Failed to sign out: {}", e));
                }
            }
            Route::OpenUrl(url) => {
                if let Err(e) = open::that(&url) {
                    tracing::warn!("Failed to open {}: {}", url, e);
                }
            }
        }
    }

    /// The route that leads to the page on screen
    fn active_route(&self) -> Route {
        match &self.page {
            Page::Feed => Route::Feed,
            Page::ComposeCode(_) => Route::ComposeCode,
            Page::ComposeBlocks(_) => Route::ComposeBlocks,
            Page::Post { id, .. } => Route::Post(id.clone()),
            Page::Profile(user_id) => Route::Profile(user_id.clone()),
        }
    }

    /// Begin publishing `draft`; block posts capture a thumbnail first
    fn start_publish(&mut self, draft: Draft, ctx: &egui::Context) {
        if !matches!(self.publish, PublishStage::Idle) {
            return;
        }
        if !self.session.is_signed_in() {
            self.alert = Some(PublishError::NotSignedIn.to_string());
            self.sign_in = Some(SignInDialog::default());
            return;
        }

        let is_block = matches!(draft.body, PostBody::Block { .. });
        if is_block && self.config.publish.thumbnails_enabled {
            tracing::debug!("Capturing thumbnail before publish");
            self.publish = PublishStage::Capturing {
                draft,
                capture: ThumbnailCapture::start(&self.config.publish),
            };
            ctx.request_repaint();
        } else {
            self.save(draft, None, ctx);
        }
    }

    fn save(&mut self, draft: Draft, thumbnail: Option<Vec<u8>>, ctx: &egui::Context) {
        let publisher = self.publisher.clone();
        let author = self.session.current();
        let ctx = ctx.clone();
        self.publish = PublishStage::Saving(Pending::spawn(
            self.runtime.handle(),
            move || publisher.publish(author.as_ref(), draft, thumbnail),
            move || ctx.request_repaint(),
        ));
    }

    /// Pick up finished background work
    fn poll_tasks(&mut self, ctx: &egui::Context) {
        if let Some(status) = self.feed_loading.as_mut().map(Pending::poll) {
            match status {
                TaskStatus::Running => {}
                TaskStatus::Finished(Ok(posts)) => {
                    tracing::debug!("Loaded {} posts", posts.len());
                    self.posts = posts;
                    self.feed_loading = None;
                }
                TaskStatus::Finished(Err(e)) => {
                    tracing::error!("Failed to load feed: {}", e);
                    self.feed_error = Some(e.to_string());
                    self.feed_loading = None;
                }
                TaskStatus::Lost => {
                    self.feed_error = Some("loading was interrupted".to_string());
                    self.feed_loading = None;
                }
            }
        }

        if let Page::Post { post, error, loading, .. } = &mut self.page {
            if let Some(status) = loading.as_mut().map(Pending::poll) {
                match status {
                    TaskStatus::Running => {}
                    TaskStatus::Finished(Ok(found)) => {
                        *post = Some(found);
                        *loading = None;
                    }
                    TaskStatus::Finished(Err(e)) => {
                        tracing::warn!("Failed to load post: {}", e);
                        *error = Some(e.to_string());
                        *loading = None;
                    }
                    TaskStatus::Lost => {
                        *error = Some("loading was interrupted".to_string());
                        *loading = None;
                    }
                }
            }
        }

        let status = match &mut self.publish {
            PublishStage::Saving(pending) => pending.poll(),
            _ => return,
        };
        match status {
            TaskStatus::Running => {}
            TaskStatus::Finished(Ok(post)) => {
                tracing::info!("Post {} is live", post.id);
                self.publish = PublishStage::Idle;
                self.navigate(Route::Feed, ctx);
            }
            TaskStatus::Finished(Err(e)) => {
                tracing::error!("Publish failed: {}", e);
                if matches!(e, PublishError::NotSignedIn) {
                    self.sign_in = Some(SignInDialog::default());
                }
                self.alert = Some(e.to_string());
                self.publish = PublishStage::Idle;
            }
            TaskStatus::Lost => {
                tracing::error!("Publish task ended without a result");
                self.alert = Some("Failed to publish".to_string());
                self.publish = PublishStage::Idle;
            }
        }
    }

    /// Draw the preview being captured and drive the capture.
    /// Returns the thumbnail, if one was made, once the capture is over.
    fn show_capture_overlay(&mut self, ctx: &egui::Context) -> Option<Option<Vec<u8>>> {
        let PublishStage::Capturing { draft, capture } = &mut self.publish else {
            return None;
        };
        let PostBody::Block { blocks } = &draft.body else {
            return Some(None);
        };

        let area = egui::Area::new(egui::Id::new("thumbnail_overlay"))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(ui.visuals().panel_fill)
                    .inner_margin(egui::Margin::same(16))
                    .show(ui, |ui| {
                        ui.set_width(THUMBNAIL_WIDTH);
                        let _ = render_blocks(ui, blocks);
                    })
                    .response
                    .rect
            });
        capture.set_target(area.inner);
        capture.update(ctx)
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Something went wrong")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, -80.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alert = None;
        }
    }

    fn set_theme(&mut self, ctx: &egui::Context, dark: bool) {
        self.config.ui.theme = if dark { "dark" } else { "light" }.to_string();
        ctx.set_visuals(visuals(dark));
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {:#}", e);
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) -> Option<Route> {
        let mut route = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Snippet").clicked() {
                        route = Some(Route::ComposeCode);
                        ui.close();
                    }
                    if ui.button("New Block Post").clicked() {
                        route = Some(Route::ComposeBlocks);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Toggle Sidebar").clicked() {
                        self.sidebar_visible = !self.sidebar_visible;
                        ui.close();
                    }
                    if ui.button("Refresh Feed").clicked() {
                        route = Some(Route::Feed);
                        ui.close();
                    }
                    ui.separator();
                    let dark = self.config.dark_mode();
                    if ui.selectable_label(dark, "Dark Theme").clicked() {
                        self.set_theme(ctx, true);
                        ui.close();
                    }
                    if ui.selectable_label(!dark, "Light Theme").clicked() {
                        self.set_theme(ctx, false);
                        ui.close();
                    }
                });

                ui.menu_button("Account", |ui| match self.session.current() {
                    Some(identity) => {
                        if ui.button("My Profile").clicked() {
                            route = Some(Route::Profile(identity.id));
                            ui.close();
                        }
                        if ui.button("Sign Out").clicked() {
                            route = Some(Route::SignOut);
                            ui.close();
                        }
                    }
                    None => {
                        if ui.button("Sign In...").clicked() {
                            route = Some(Route::SignIn);
                            ui.close();
                        }
                    }
                });
            });
        });
        route
    }
}

impl eframe::App for ScriptShotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard shortcuts
        let (toggle_sidebar, refresh) = ctx.input(|i| {
            (
                i.modifiers.ctrl && i.key_pressed(egui::Key::B),
                i.modifiers.ctrl && i.key_pressed(egui::Key::R),
            )
        });
        if toggle_sidebar {
            self.sidebar_visible = !self.sidebar_visible;
        }

        self.poll_tasks(ctx);

        let mut route = self.render_menu_bar(ctx);
        if refresh {
            route = Some(Route::Feed);
        }

        let identity = self.session.current();

        if self.sidebar_visible {
            let active = self.active_route();
            egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(self.config.ui.sidebar_width)
                .min_width(150.0)
                .show(ctx, |ui| {
                    if let Some(r) = Sidebar::show(ui, identity.as_ref(), &active) {
                        route = Some(r);
                    }
                });
        }

        let busy = !matches!(self.publish, PublishStage::Idle);
        let dark = self.config.dark_mode();
        let font_size = self.config.editor.font_size;
        let code_font_size = self.config.editor.code_font_size;

        let outcome = egui::CentralPanel::default()
            .show(ctx, |ui| match &mut self.page {
                Page::Feed => self
                    .feed_page
                    .show(
                        ui,
                        FeedView {
                            posts: &self.posts,
                            loading: self.feed_loading.is_some(),
                            error: self.feed_error.as_deref(),
                            dark,
                            code_font_size,
                        },
                    )
                    .map(EditorOutcome::Navigate),
                Page::ComposeCode(composer) => composer
                    .show(ui, busy, font_size, dark)
                    .map(EditorOutcome::Publish),
                Page::ComposeBlocks(editor) => editor.show(ui, busy),
                Page::Post { post, error, loading, .. } => PostView::show(
                    ui,
                    post.as_ref(),
                    loading.is_some(),
                    error.as_deref(),
                    dark,
                    code_font_size,
                )
                .map(EditorOutcome::Navigate),
                Page::Profile(user_id) => ProfilePage::show(
                    ui,
                    user_id,
                    &self.posts,
                    identity.as_ref(),
                    dark,
                    code_font_size,
                )
                .map(EditorOutcome::Navigate),
            })
            .inner;

        match outcome {
            Some(EditorOutcome::Publish(draft)) => self.start_publish(draft, ctx),
            Some(EditorOutcome::Navigate(r)) => route = Some(r),
            None => {}
        }

        if let Some(thumbnail) = self.show_capture_overlay(ctx) {
            let stage = std::mem::replace(&mut self.publish, PublishStage::Idle);
            if let PublishStage::Capturing { draft, .. } = stage {
                self.save(draft, thumbnail, ctx);
            }
        }

        if let Some(dialog) = self.sign_in.as_mut() {
            if dialog.show(ctx, &self.session) == DialogState::Closed {
                self.sign_in = None;
            }
        }
        self.show_alert(ctx);

        if let Some(route) = route {
            self.navigate(route, ctx);
        }
    }
}
