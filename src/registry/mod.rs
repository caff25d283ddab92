//! Core window registry
//!
//! This module implements the in-memory window table and display-order
//! stack, including:
//! - Registration and removal of window descriptors
//! - Z-order stacking (bring-to-front, send-to-back)
//! - The normal/minimized/maximized state machine with cached geometry
//! - Snap-zone placement and lock enforcement
//! - Window grouping for batch operations
//! - Named layout snapshots persisted through a pluggable store
//!
//! The registry owns its windows and stack for the lifetime of the
//! instance; the set of stacked ids and the set of registered ids are kept
//! identical by every operation. Instances are constructed explicitly so
//! tests and hosts can hold isolated registries.

use crate::config::StrataConfig;
use crate::events::{EventBus, RegistryEvent};
use crate::layout::{LayoutSnapshot, LayoutStore, MemoryLayoutStore};
use crate::zones::Zone;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by registry operations. All are caller-recoverable;
/// none leave the registry in an inconsistent state.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("window id {0:?} is already registered")]
    DuplicateId(String),

    #[error("window {0:?} not found")]
    NotFound(String),

    #[error("window {0:?} is locked")]
    Locked(String),

    #[error("unknown snap zone {0:?}")]
    InvalidZone(String),

    #[error("layout store error: {0}")]
    Store(#[source] anyhow::Error),
}

/// Window position in work-area coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Window size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Cached geometry for restore operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub position: Position,
    pub size: Size,
}

/// Display state of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    Normal,
    Minimized,
    Maximized,
}

/// A single managed window descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Unique identifier, immutable after registration
    pub id: String,

    /// Display title
    pub title: String,

    /// Opaque tag naming what content the window renders
    pub component: String,

    /// Current display state
    pub state: WindowState,

    /// Position, meaningful while `state` is normal
    pub position: Position,

    /// Size in pixels
    pub size: Size,

    /// When true, position/size mutations are rejected
    #[serde(default)]
    pub locked: bool,

    /// Group tag, if any
    #[serde(default)]
    pub group_id: Option<String>,

    /// Geometry cached by minimize/maximize, consumed by restore.
    /// Serialized with layouts so a loaded maximized window can still
    /// restore to its original rectangle.
    #[serde(default)]
    pub saved_rect: Option<Rect>,
}

/// Registration request. Only `component` is required; everything else
/// falls back to generated or configured defaults.
#[derive(Debug, Clone, Default)]
pub struct WindowDescriptor {
    pub id: Option<String>,
    pub title: Option<String>,
    pub component: String,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub locked: bool,
}

impl WindowDescriptor {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.size = Some(Size { width, height });
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }
}

/// Partial update for [`WindowRegistry::update_window`]. Unset fields are
/// left unchanged on the target window.
#[derive(Debug, Clone, Default)]
pub struct WindowPatch {
    pub title: Option<String>,
    pub component: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
}

impl WindowPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Some(Size { width, height });
        self
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.component.is_none()
            && self.position.is_none()
            && self.size.is_none()
    }

    fn touches_geometry(&self) -> bool {
        self.position.is_some() || self.size.is_some()
    }
}

/// The window registry: window table plus display-order stack
pub struct WindowRegistry {
    config: StrataConfig,

    /// Window tracking by id
    windows: HashMap<String, Window>,

    /// Display order, back to front; the last element is frontmost
    stack: VecDeque<String>,

    /// Counter for generated window ids
    next_window_id: u64,

    /// Notification fan-out to UI bindings
    events: EventBus,

    /// Persistence collaborator for named layouts
    store: Arc<dyn LayoutStore>,
}

impl WindowRegistry {
    /// Create a registry backed by an in-memory layout store
    pub fn new(config: &StrataConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryLayoutStore::default()))
    }

    /// Create a registry backed by an explicit layout store
    pub fn with_store(config: &StrataConfig, store: Arc<dyn LayoutStore>) -> Self {
        Self {
            config: config.clone(),
            windows: HashMap::new(),
            stack: VecDeque::new(),
            next_window_id: 0,
            events: EventBus::new(),
            store,
        }
    }

    /// Handle for subscribing to registry notifications
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    // === Registration ===

    /// Register a new window. The descriptor's id is honored when present
    /// (collision is an error); otherwise an id is generated. The window
    /// starts in the normal state at the front of the stack.
    pub fn register_window(
        &mut self,
        descriptor: WindowDescriptor,
    ) -> Result<Window, RegistryError> {
        let id = match descriptor.id {
            Some(id) => {
                if self.windows.contains_key(&id) {
                    return Err(RegistryError::DuplicateId(id));
                }
                id
            }
            None => self.generate_id(),
        };

        let window = Window {
            title: descriptor.title.unwrap_or_else(|| descriptor.component.clone()),
            component: descriptor.component,
            state: WindowState::Normal,
            position: descriptor.position.unwrap_or(Position {
                x: self.config.window.default_x,
                y: self.config.window.default_y,
            }),
            size: descriptor.size.unwrap_or(Size {
                width: self.config.window.default_width,
                height: self.config.window.default_height,
            }),
            locked: descriptor.locked,
            group_id: None,
            saved_rect: None,
            id: id.clone(),
        };

        debug!("Registered window {} ({})", id, window.component);
        self.windows.insert(id.clone(), window.clone());
        self.stack.push_back(id.clone());
        self.events.emit(&RegistryEvent::Registered { id });

        Ok(window)
    }

    /// Remove a window from the registry and the stack. Returns whether a
    /// window was actually removed; unknown ids are a soft failure since
    /// callers often unregister defensively.
    pub fn unregister_window(&mut self, id: &str) -> bool {
        if self.windows.remove(id).is_none() {
            return false;
        }
        self.stack.retain(|stacked| stacked != id);
        debug!("Unregistered window {}", id);
        self.events.emit(&RegistryEvent::Unregistered { id: id.to_string() });
        true
    }

    fn generate_id(&mut self) -> String {
        loop {
            self.next_window_id += 1;
            let candidate = format!("window-{}", self.next_window_id);
            if !self.windows.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    // === Lookup ===

    /// Pure lookup by id
    pub fn get_window(&self, id: &str) -> Option<Window> {
        self.windows.get(id).cloned()
    }

    /// All windows as defensive copies, in stack order (back to front)
    pub fn get_all_windows(&self) -> Vec<Window> {
        self.stack
            .iter()
            .filter_map(|id| self.windows.get(id).cloned())
            .collect()
    }

    /// Display order, back to front
    pub fn stack_order(&self) -> Vec<String> {
        self.stack.iter().cloned().collect()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    // === Updates ===

    /// Merge a partial update into a window. Position/size changes on a
    /// locked window are rejected with [`RegistryError::Locked`].
    pub fn update_window(&mut self, id: &str, patch: WindowPatch) -> Result<Window, RegistryError> {
        let window = self
            .windows
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if window.locked && patch.touches_geometry() {
            return Err(RegistryError::Locked(id.to_string()));
        }

        if patch.is_empty() {
            return Ok(window.clone());
        }

        if let Some(title) = patch.title {
            window.title = title;
        }
        if let Some(component) = patch.component {
            window.component = component;
        }
        if let Some(position) = patch.position {
            window.position = position;
        }
        if let Some(size) = patch.size {
            window.size = size;
        }

        let updated = window.clone();
        debug!("Updated window {}", id);
        self.events.emit(&RegistryEvent::Updated { id: id.to_string() });
        Ok(updated)
    }

    /// Flip a window's lock. Returns the new lock state, or `None` for an
    /// unknown id.
    pub fn toggle_lock(&mut self, id: &str) -> Option<bool> {
        let window = self.windows.get_mut(id)?;
        window.locked = !window.locked;
        let locked = window.locked;
        debug!("Window {} locked set to {}", id, locked);
        self.events.emit(&RegistryEvent::Updated { id: id.to_string() });
        Some(locked)
    }

    // === Stacking ===

    /// Move a window to the frontmost stack position. Returns whether the
    /// stack changed; unknown or already-frontmost ids are a no-op.
    pub fn bring_to_front(&mut self, id: &str) -> bool {
        if !self.windows.contains_key(id) {
            return false;
        }
        if self.stack.back().map(String::as_str) == Some(id) {
            return false;
        }
        self.stack.retain(|stacked| stacked != id);
        self.stack.push_back(id.to_string());
        debug!("Brought window {} to front", id);
        self.events
            .emit(&RegistryEvent::BroughtToFront { id: id.to_string() });
        true
    }

    /// Move a window to the backmost stack position. Symmetric to
    /// [`Self::bring_to_front`].
    pub fn send_to_back(&mut self, id: &str) -> bool {
        if !self.windows.contains_key(id) {
            return false;
        }
        if self.stack.front().map(String::as_str) == Some(id) {
            return false;
        }
        self.stack.retain(|stacked| stacked != id);
        self.stack.push_front(id.to_string());
        debug!("Sent window {} to back", id);
        self.events
            .emit(&RegistryEvent::SentToBack { id: id.to_string() });
        true
    }

    // === Display state machine ===

    /// Minimize a window. Applies only from the normal state and caches the
    /// current geometry for restore; minimizing a maximized window is a
    /// no-op (it must be restored first). Returns whether the state changed.
    pub fn minimize_window(&mut self, id: &str) -> Result<bool, RegistryError> {
        let window = self
            .windows
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if window.state != WindowState::Normal {
            return Ok(false);
        }

        window.saved_rect = Some(Rect {
            position: window.position,
            size: window.size,
        });
        window.state = WindowState::Minimized;
        debug!("Minimized window {}", id);
        self.events
            .emit(&RegistryEvent::Minimized { id: id.to_string() });
        Ok(true)
    }

    /// Maximize a window to the configured work area. Applies only from the
    /// normal state; maximizing a minimized window is a no-op. Returns
    /// whether the state changed.
    pub fn maximize_window(&mut self, id: &str) -> Result<bool, RegistryError> {
        let area = self.config.zone.work_area;
        let window = self
            .windows
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if window.state != WindowState::Normal {
            return Ok(false);
        }

        window.saved_rect = Some(Rect {
            position: window.position,
            size: window.size,
        });
        window.state = WindowState::Maximized;
        window.position = Position {
            x: area.x,
            y: area.y,
        };
        window.size = Size {
            width: area.width,
            height: area.height,
        };
        debug!("Maximized window {}", id);
        self.events
            .emit(&RegistryEvent::Maximized { id: id.to_string() });
        Ok(true)
    }

    /// Restore a minimized or maximized window to the normal state,
    /// re-applying the cached geometry. Returns whether the state changed.
    pub fn restore_window(&mut self, id: &str) -> Result<bool, RegistryError> {
        let window = self
            .windows
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if window.state == WindowState::Normal {
            return Ok(false);
        }

        if let Some(rect) = window.saved_rect.take() {
            window.position = rect.position;
            window.size = rect.size;
        }
        window.state = WindowState::Normal;
        debug!("Restored window {}", id);
        self.events
            .emit(&RegistryEvent::Restored { id: id.to_string() });
        Ok(true)
    }

    // === Zones ===

    /// Snap a window to a named zone, applying the zone's canonical
    /// geometry against the configured work area. The window lands in the
    /// normal state.
    pub fn snap_to_zone(&mut self, id: &str, zone: &str) -> Result<Window, RegistryError> {
        let zone = Zone::from_name(zone)
            .ok_or_else(|| RegistryError::InvalidZone(zone.to_string()))?;
        let (position, size) = zone.rect(&self.config.zone.work_area, self.config.zone.gap);

        let window = self
            .windows
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        if window.locked {
            return Err(RegistryError::Locked(id.to_string()));
        }

        // Snapping supersedes any cached restore geometry
        window.state = WindowState::Normal;
        window.saved_rect = None;
        window.position = position;
        window.size = size;

        let updated = window.clone();
        debug!("Snapped window {} to {}", id, zone.name());
        self.events.emit(&RegistryEvent::Updated { id: id.to_string() });
        Ok(updated)
    }

    // === Groups ===

    /// Tag every listed window with a group id. Unknown ids are silently
    /// skipped; grouping is a UI convenience and partial-failure rollback
    /// is not worth the complexity. Returns how many windows were tagged.
    pub fn create_group(&mut self, group_id: &str, window_ids: &[String]) -> usize {
        let mut tagged = 0;
        for id in window_ids {
            match self.windows.get_mut(id) {
                Some(window) => {
                    window.group_id = Some(group_id.to_string());
                    tagged += 1;
                }
                None => warn!("Skipping unknown window {} while grouping {}", id, group_id),
            }
        }
        debug!("Grouped {} windows under {}", tagged, group_id);
        tagged
    }

    /// All windows tagged with a group, in stack order
    pub fn get_group_windows(&self, group_id: &str) -> Vec<Window> {
        self.stack
            .iter()
            .filter_map(|id| self.windows.get(id))
            .filter(|window| window.group_id.as_deref() == Some(group_id))
            .cloned()
            .collect()
    }

    /// Clear a group tag from all of its members. Returns how many windows
    /// were untagged.
    pub fn ungroup(&mut self, group_id: &str) -> usize {
        let mut cleared = 0;
        for window in self.windows.values_mut() {
            if window.group_id.as_deref() == Some(group_id) {
                window.group_id = None;
                cleared += 1;
            }
        }
        debug!("Ungrouped {} windows from {}", cleared, group_id);
        cleared
    }

    /// Raise every member of a group to the front, preserving their
    /// relative stacking order. Returns how many windows moved.
    pub fn bring_group_to_front(&mut self, group_id: &str) -> usize {
        let members: Vec<String> = self
            .get_group_windows(group_id)
            .into_iter()
            .map(|window| window.id)
            .collect();

        // Raising members in stack order keeps their relative order intact
        let mut moved = 0;
        for id in &members {
            if self.bring_to_front(id) {
                moved += 1;
            }
        }
        moved
    }

    // === Layout persistence ===

    /// Serialize the full window/stack snapshot and write it to the store
    /// under `name`, overwriting any prior layout of that name.
    pub async fn save_layout(&self, name: &str) -> Result<(), RegistryError> {
        let snapshot = LayoutSnapshot::capture(self.get_all_windows());
        let blob = serde_json::to_string(&snapshot)
            .map_err(|e| RegistryError::Store(e.into()))?;
        self.store
            .set(name, &blob)
            .await
            .map_err(RegistryError::Store)?;

        info!("Saved layout {:?} ({} windows)", name, snapshot.windows.len());
        self.events.emit(&RegistryEvent::LayoutSaved {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Load a named layout, replacing the entire live registry and stack
    /// with the persisted snapshot. Returns `Ok(false)` without touching
    /// live state when no layout of that name exists; a failed read or
    /// decode likewise leaves live state unmodified.
    pub async fn load_layout(&mut self, name: &str) -> Result<bool, RegistryError> {
        let blob = match self.store.get(name).await.map_err(RegistryError::Store)? {
            Some(blob) => blob,
            None => {
                debug!("Layout {:?} not found", name);
                return Ok(false);
            }
        };

        let snapshot: LayoutSnapshot =
            serde_json::from_str(&blob).map_err(|e| RegistryError::Store(e.into()))?;
        snapshot.validate().map_err(RegistryError::Store)?;

        // The read fully resolved; swap the live state
        let (windows, stack) = snapshot.into_state();
        self.windows = windows;
        self.stack = stack;

        info!("Loaded layout {:?} ({} windows)", name, self.windows.len());
        self.events.emit(&RegistryEvent::LayoutLoaded {
            name: name.to_string(),
        });
        Ok(true)
    }

    /// Names of all persisted layouts
    pub async fn saved_layouts(&self) -> Result<Vec<String>, RegistryError> {
        self.store.keys(None).await.map_err(RegistryError::Store)
    }

    /// Remove a persisted layout. A no-op when absent.
    pub async fn delete_layout(&self, name: &str) -> Result<(), RegistryError> {
        self.store.delete(name).await.map_err(RegistryError::Store)?;
        debug!("Deleted layout {:?}", name);
        Ok(())
    }
}
