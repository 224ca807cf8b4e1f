//! The view owned by the UI thread.

/// Surface that can be reloaded. Only ever touched on the UI thread.
pub trait View {
    fn title(&self) -> &str;

    /// Reload the displayed content.
    fn reload(&mut self) -> anyhow::Result<()>;
}

/// View without a native window: reloads are counted and reported.
#[derive(Debug)]
pub struct HeadlessView {
    title: String,
    reloads: usize,
}

impl HeadlessView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reloads: 0,
        }
    }

    pub fn reloads(&self) -> usize {
        self.reloads
    }
}

impl View for HeadlessView {
    fn title(&self) -> &str {
        &self.title
    }

    fn reload(&mut self) -> anyhow::Result<()> {
        self.reloads += 1;
        crate::logger::status_success(&format!("reloaded {} (#{})", self.title, self.reloads));
        Ok(())
    }
}
