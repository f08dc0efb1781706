// Transient UI state: which overlay is open, what is selected, the live
// search query. All transitions go through the handlers here so overlays stay
// mutually exclusive and the scroll lock can never leak.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::search::search;
use crate::types::{MovieId, Overlay};

/// Page-level scroll lock. Process-wide singleton held while an overlay is
/// open and released on every path back to none.
#[derive(Debug, Default)]
pub struct ScrollLock {
    engaged: bool,
}

impl ScrollLock {
    fn engage(&mut self) {
        self.engaged = true;
    }

    fn release(&mut self) {
        self.engaged = false;
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

/// Serializable snapshot handed to the render surface after every update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiStateView {
    pub overlay: Overlay,
    pub selected: Option<MovieId>,
    pub query: String,
    pub results: Vec<MovieId>,
    pub header_condensed: bool,
    pub menu_open: bool,
    pub scroll_locked: bool,
}

/// Single source of truth for transient UI state.
#[derive(Debug)]
pub struct UiSession {
    overlay: Overlay,
    selected: Option<MovieId>,
    query: String,
    results: Vec<MovieId>,
    menu_open: bool,
    header_condensed: bool,
    header_threshold: f32,
    scroll_lock: ScrollLock,
}

impl UiSession {
    pub fn new(header_threshold: f32) -> Self {
        UiSession {
            overlay: Overlay::None,
            selected: None,
            query: String::new(),
            results: Vec::new(),
            menu_open: false,
            header_condensed: false,
            header_threshold,
            scroll_lock: ScrollLock::default(),
        }
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn selected(&self) -> Option<MovieId> {
        self.selected
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[MovieId] {
        &self.results
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_engaged()
    }

    /// Open the search overlay. No-op if it is already open; closes the
    /// detail overlay first if that one is up.
    pub fn open_search(&mut self) -> bool {
        if self.overlay == Overlay::Search {
            return false;
        }
        if self.overlay == Overlay::Detail {
            self.selected = None;
        }
        self.overlay = Overlay::Search;
        self.scroll_lock.engage();
        tracing::debug!("search overlay opened");
        true
    }

    /// Close the search overlay and reset the query state.
    pub fn close_search(&mut self) -> bool {
        if self.overlay != Overlay::Search {
            return false;
        }
        self.overlay = Overlay::None;
        self.query.clear();
        self.results.clear();
        self.scroll_lock.release();
        tracing::debug!("search overlay closed");
        true
    }

    /// Select a record and open the detail overlay. Refuses ids the catalog
    /// does not know rather than opening an empty modal. Selecting while
    /// search is open closes search (and its query) first.
    pub fn select_record(&mut self, catalog: &Catalog, id: MovieId) -> bool {
        if catalog.get(id).is_none() {
            tracing::debug!(id = id.as_u32(), "refusing to select unknown record");
            return false;
        }
        if self.overlay == Overlay::Search {
            self.close_search();
        }
        self.selected = Some(id);
        self.overlay = Overlay::Detail;
        self.menu_open = false;
        self.scroll_lock.engage();
        tracing::debug!(id = id.as_u32(), "record selected");
        true
    }

    /// Close the detail overlay and clear the selection.
    pub fn close_detail(&mut self) -> bool {
        if self.overlay != Overlay::Detail {
            return false;
        }
        self.overlay = Overlay::None;
        self.selected = None;
        self.scroll_lock.release();
        tracing::debug!("detail overlay closed");
        true
    }

    /// Abrupt close of whichever overlay is up (backdrop click, escape).
    /// Releases the scroll lock on every route out.
    pub fn close_overlay(&mut self) -> bool {
        match self.overlay {
            Overlay::Search => self.close_search(),
            Overlay::Detail => self.close_detail(),
            Overlay::None => false,
        }
    }

    /// Update the query and synchronously recompute results. The results are
    /// always exactly the filter output for the current query.
    pub fn set_query(&mut self, catalog: &Catalog, text: &str) -> &[MovieId] {
        self.query = text.to_string();
        self.results = search(&self.query, catalog.records())
            .into_iter()
            .map(|movie| movie.id)
            .collect();
        &self.results
    }

    /// Track the page scroll offset for the condensed-header flag.
    pub fn on_scroll(&mut self, offset: f32) {
        self.header_condensed = offset > self.header_threshold;
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn view(&self) -> UiStateView {
        UiStateView {
            overlay: self.overlay,
            selected: self.selected,
            query: self.query.clone(),
            results: self.results.clone(),
            header_condensed: self.header_condensed,
            menu_open: self.menu_open,
            scroll_locked: self.scroll_lock.is_engaged(),
        }
    }
}
