//! Menu bar UI for the timer daemon.
//!
//! - `icon.rs`: title text generation (e.g. "🍅 15:30")
//! - `menu.rs`: menu model for a timer state
//! - `event.rs`: menu item identifiers, actions and tray updates
//! - `mod.rs`: [`TrayIconManager`], backed by `tray-icon` on macOS
//!
//! The daemon's presenter sends [`TrayUpdate`]s over a crossbeam channel; the
//! daemon loop drains them with [`TrayIconManager::process_pending_updates`]
//! and polls clicks with [`TrayIconManager::poll_clicks`]. Both run on the
//! main thread, which is where macOS wants the status item to live.
//!
//! On other platforms the manager keeps its model up to date but draws nothing.

pub mod event;
pub mod icon;
pub mod menu;

pub use event::{EventHandler, MenuAction, MenuItemId, TrayUpdate};
pub use icon::IconManager;
pub use menu::{MenuBuilder, MenuConfig, MenuItemConfig};

use crossbeam_channel::{Receiver, TryRecvError};

use crate::types::TimerState;

// ============================================================================
// Native menu (macOS)
// ============================================================================

/// Handles to the native menu items whose text or state follow the timer.
#[cfg(target_os = "macos")]
struct NativeTray {
    tray_icon: tray_icon::TrayIcon,
    status_items: Vec<tray_icon::menu::MenuItem>,
    action_items: Vec<(MenuItemId, tray_icon::menu::MenuItem)>,
}

#[cfg(target_os = "macos")]
impl NativeTray {
    fn build(title: &str, config: &MenuConfig) -> anyhow::Result<Self> {
        use anyhow::Context;
        use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};
        use tray_icon::TrayIconBuilder;

        let menu = Menu::new();

        menu.append(&MenuItem::new(&config.title.text, false, None))?;
        menu.append(&PredefinedMenuItem::separator())?;

        let mut status_items = Vec::with_capacity(config.status_items.len());
        for item in &config.status_items {
            let native = MenuItem::new(&item.text, false, None);
            menu.append(&native)?;
            status_items.push(native);
        }

        menu.append(&PredefinedMenuItem::separator())?;

        let mut action_items = Vec::new();
        for (id, item) in config.actions() {
            if id == MenuItemId::Quit {
                menu.append(&PredefinedMenuItem::separator())?;
            }
            let native = MenuItem::with_id(id.as_str(), &item.text, item.enabled, None);
            menu.append(&native)?;
            action_items.push((id, native));
        }

        let tray_icon = TrayIconBuilder::new()
            .with_title(title)
            .with_menu(Box::new(menu))
            .with_tooltip(crate::notification::APP_TITLE)
            .build()
            .context("Failed to create the menu bar item")?;

        Ok(Self {
            tray_icon,
            status_items,
            action_items,
        })
    }

    fn apply(&self, title: &str, config: &MenuConfig) {
        self.tray_icon.set_title(Some(title));

        for (native, item) in self.status_items.iter().zip(&config.status_items) {
            native.set_text(&item.text);
        }

        for (id, item) in config.actions() {
            if let Some((_, native)) = self.action_items.iter().find(|(i, _)| *i == id) {
                native.set_text(&item.text);
                native.set_enabled(item.enabled);
            }
        }
    }
}

/// Lets AppKit process pending events without blocking.
#[cfg(target_os = "macos")]
fn pump_run_loop() {
    use objc2_foundation::{NSDate, NSDefaultRunLoopMode, NSRunLoop};

    let run_loop = NSRunLoop::currentRunLoop();
    let past = NSDate::distantPast();
    // SAFETY: called on the main thread from the daemon loop.
    unsafe {
        run_loop.runMode_beforeDate(NSDefaultRunLoopMode, &past);
    }
}

// ============================================================================
// TrayIconManager
// ============================================================================

/// Manages the menu bar item.
///
/// Coordinates [`IconManager`] (title), [`MenuBuilder`] (menu model) and
/// [`EventHandler`] (clicks). Only the macOS build owns a native item.
pub struct TrayIconManager {
    icon_manager: IconManager,
    menu_builder: MenuBuilder,
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    event_handler: EventHandler,
    /// Last state received from the presenter
    current_state: TimerState,
    /// Cadence shown in the cycle line
    long_break_every: u32,
    /// Updates from the presenter
    update_rx: Receiver<TrayUpdate>,
    initialized: bool,
    #[cfg(target_os = "macos")]
    native: Option<NativeTray>,
}

impl TrayIconManager {
    /// Creates a manager. Nothing is drawn until [`TrayIconManager::initialize`].
    pub fn new(
        initial_state: TimerState,
        long_break_every: u32,
        update_rx: Receiver<TrayUpdate>,
    ) -> Self {
        Self {
            icon_manager: IconManager::new(),
            menu_builder: MenuBuilder::new(),
            event_handler: EventHandler::new(),
            current_state: initial_state,
            long_break_every,
            update_rx,
            initialized: false,
            #[cfg(target_os = "macos")]
            native: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn current_state(&self) -> &TimerState {
        &self.current_state
    }

    /// Generates the current title for the menu bar.
    pub fn generate_title(&self) -> String {
        self.icon_manager.generate_title(&self.current_state)
    }

    /// Generates the current menu configuration.
    pub fn generate_menu_config(&self) -> MenuConfig {
        self.menu_builder
            .build(&self.current_state, self.long_break_every)
    }

    /// Drains every pending update. Returns the number processed.
    pub fn process_pending_updates(&mut self) -> usize {
        let mut processed = 0;
        loop {
            match self.update_rx.try_recv() {
                Ok(update) => {
                    self.handle_update(update);
                    processed += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.initialized {
                        tracing::warn!("Menu bar update channel disconnected");
                        self.shutdown();
                    }
                    break;
                }
            }
        }
        processed
    }

    fn handle_update(&mut self, update: TrayUpdate) {
        match update {
            TrayUpdate::Refresh {
                state,
                long_break_every,
            } => {
                if self.icon_manager.phase_changed(state.phase) {
                    tracing::debug!(phase = %state.phase, "Menu bar phase changed");
                }
                self.current_state = state;
                self.long_break_every = long_break_every;
                self.redraw();
            }
            TrayUpdate::Shutdown => {
                tracing::info!("Shutting down the menu bar item");
                self.shutdown();
            }
        }
    }

    fn redraw(&self) {
        #[cfg(target_os = "macos")]
        if let Some(ref native) = self.native {
            native.apply(&self.generate_title(), &self.generate_menu_config());
        }
    }

    /// Returns the actions clicked since the last poll.
    pub fn poll_clicks(&self) -> Vec<MenuAction> {
        #[allow(unused_mut)]
        let mut actions = Vec::new();

        #[cfg(target_os = "macos")]
        if self.initialized {
            pump_run_loop();
            while let Ok(event) = tray_icon::menu::MenuEvent::receiver().try_recv() {
                let id = MenuItemId::from_id(&event.id.0);
                actions.extend(self.event_handler.handle_click(id));
            }
        }

        actions
    }

    /// Removes the menu bar item.
    pub fn shutdown(&mut self) {
        self.initialized = false;
        #[cfg(target_os = "macos")]
        {
            self.native = None;
        }
    }

    /// Creates the native menu bar item. Must run on the main thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the tray icon cannot be created.
    #[cfg(target_os = "macos")]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        let native = NativeTray::build(&self.generate_title(), &self.generate_menu_config())?;
        self.native = Some(native);
        self.initialized = true;

        tracing::info!("Menu bar item initialized");
        Ok(())
    }

    /// Initializes the model only (non-macOS).
    #[cfg(not(target_os = "macos"))]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        tracing::warn!("The menu bar item is only drawn on macOS");
        self.initialized = true;
        Ok(())
    }
}

impl std::fmt::Debug for TrayIconManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayIconManager")
            .field("initialized", &self.initialized)
            .field("current_state", &self.current_state)
            .field("long_break_every", &self.long_break_every)
            .finish_non_exhaustive()
    }
}
