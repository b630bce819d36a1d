//! Collaborative whiteboard page.

use tracing::{debug, warn};

use crate::config::Timeouts;
use crate::driver::{AppPage, Target};
use crate::error::Result;

use super::{click_first, first_visible};

/// Drawing tools on the whiteboard toolbar, addressed by their title
/// attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Pencil,
    Line,
    Rectangle,
    Ellipse,
    Arrow,
    Eraser,
}

impl Tool {
    pub fn title(self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Line => "Line",
            Tool::Rectangle => "Rectangle",
            Tool::Ellipse => "Ellipse",
            Tool::Arrow => "Arrow",
            Tool::Eraser => "Eraser",
        }
    }

    pub fn target(self) -> Target {
        Target::css(format!(r#"[title="{}"]"#, self.title()))
    }

    pub const ALL: [Tool; 6] = [
        Tool::Pencil,
        Tool::Line,
        Tool::Rectangle,
        Tool::Ellipse,
        Tool::Arrow,
        Tool::Eraser,
    ];
}

/// Locators for the whiteboard surface and its toolbar.
#[derive(Debug, Clone)]
pub struct WhiteboardUi {
    pub whiteboard_tab: Target,
    pub stream_tab: Target,
    pub canvas: Target,
    pub undo: Target,
    pub redo: Target,
    /// Clear controls vary between layout revisions; checked in order.
    pub clear_controls: Vec<Target>,
    pub zoom_in_controls: Vec<Target>,
    pub zoom_out_controls: Vec<Target>,
    pub pan_controls: Vec<Target>,
    pub save_controls: Vec<Target>,
}

impl Default for WhiteboardUi {
    fn default() -> Self {
        Self {
            whiteboard_tab: Target::text("Whiteboard"),
            stream_tab: Target::text("Stream"),
            canvas: Target::css("canvas"),
            undo: Target::css(r#"[title="Undo"]"#),
            redo: Target::css(r#"[title="Redo"]"#),
            clear_controls: vec![Target::text("Clear"), Target::css(r#"[title*="Clear"]"#)],
            zoom_in_controls: vec![Target::css(r#"[title*="Zoom in"]"#), Target::text("+")],
            zoom_out_controls: vec![Target::css(r#"[title*="Zoom out"]"#), Target::text("-")],
            pan_controls: vec![
                Target::css(r#"[title*="Pan"]"#),
                Target::css(r#"[title*="Hand"]"#),
                Target::css(r#"[aria-label*="pan"]"#),
            ],
            save_controls: vec![
                Target::text("Save"),
                Target::css(r#"[title*="Save"]"#),
                Target::css(r#"[aria-label*="save"]"#),
            ],
        }
    }
}

/// Intent-level operations for drawing on the shared whiteboard.
pub struct WhiteboardPage<'a> {
    page: &'a dyn AppPage,
    timeouts: Timeouts,
    ui: WhiteboardUi,
}

impl<'a> WhiteboardPage<'a> {
    pub fn new(page: &'a dyn AppPage, timeouts: Timeouts) -> Self {
        Self {
            page,
            timeouts,
            ui: WhiteboardUi::default(),
        }
    }

    pub fn with_ui(mut self, ui: WhiteboardUi) -> Self {
        self.ui = ui;
        self
    }

    /// Switches to the whiteboard tab and waits for the canvas to mount.
    pub async fn open(&self) -> Result<()> {
        self.page.click(&self.ui.whiteboard_tab).await?;
        self.page
            .wait_for_target(&self.ui.canvas, self.timeouts.scaled(self.timeouts.primary))
            .await
    }

    pub async fn back_to_stream(&self) -> Result<()> {
        self.page.click(&self.ui.stream_tab).await
    }

    /// Counts the toolbar tools that rendered. Tool availability differs by
    /// role, so a partial toolbar is not an error.
    pub async fn tools_ready(&self) -> Result<usize> {
        let timeout = self.timeouts.secondary;
        let mut ready = 0;
        for tool in Tool::ALL {
            if self.page.is_visible(&tool.target(), timeout).await? {
                ready += 1;
            }
        }
        Ok(ready)
    }

    pub async fn select_tool(&self, tool: Tool) -> Result<()> {
        debug!(target: "golive::pages", tool = tool.title(), "selecting whiteboard tool");
        self.page.click(&tool.target()).await
    }

    /// Draws one stroke with the currently selected tool, coordinates
    /// relative to the canvas top-left corner.
    pub async fn draw_stroke(&self, from: (f64, f64), to: (f64, f64)) -> Result<()> {
        self.page.drag(&self.ui.canvas, from, to).await
    }

    /// Selects `tool` and draws one stroke with it.
    pub async fn draw_with(&self, tool: Tool, from: (f64, f64), to: (f64, f64)) -> Result<()> {
        self.select_tool(tool).await?;
        self.draw_stroke(from, to).await
    }

    /// Sweeps the eraser across the given region.
    pub async fn erase_area(&self, from: (f64, f64), to: (f64, f64)) -> Result<()> {
        self.draw_with(Tool::Eraser, from, to).await
    }

    pub async fn undo(&self) -> Result<()> {
        self.page.click(&self.ui.undo).await
    }

    pub async fn redo(&self) -> Result<()> {
        self.page.click(&self.ui.redo).await
    }

    /// Clears the board through the first clear control present. `Ok(false)`
    /// when the toolbar has no clear control in the current layout.
    pub async fn clear_board(&self) -> Result<bool> {
        let cleared = click_first(self.page, &self.ui.clear_controls, self.timeouts.secondary).await?;
        if !cleared {
            warn!(target: "golive::pages", "no clear control found on whiteboard toolbar");
        }
        Ok(cleared)
    }

    /// Zooms in then back out; absent controls are reported, not fatal.
    pub async fn zoom_cycle(&self) -> Result<bool> {
        let zoomed_in =
            click_first(self.page, &self.ui.zoom_in_controls, self.timeouts.secondary).await?;
        if !zoomed_in {
            return Ok(false);
        }
        click_first(self.page, &self.ui.zoom_out_controls, self.timeouts.secondary).await
    }

    /// Switches to the pan tool and drags the canvas. `Ok(false)` when no
    /// pan control exists.
    pub async fn pan(&self, from: (f64, f64), to: (f64, f64)) -> Result<bool> {
        let grabbed = click_first(self.page, &self.ui.pan_controls, self.timeouts.secondary).await?;
        if !grabbed {
            return Ok(false);
        }
        self.page.drag(&self.ui.canvas, from, to).await?;
        Ok(true)
    }

    /// Exports the board through the first save control present.
    pub async fn save_snapshot(&self) -> Result<bool> {
        match first_visible(self.page, &self.ui.save_controls, self.timeouts.secondary).await? {
            Some(control) => {
                self.page.click(control).await?;
                Ok(true)
            }
            None => {
                warn!(target: "golive::pages", "no save control found on whiteboard toolbar");
                Ok(false)
            }
        }
    }
}
