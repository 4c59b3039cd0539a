use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SectionId {
    Bandwidth,
    Packets,
    TopApplications,
    Collector,
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionId::Bandwidth => write!(f, "Network Bandwidth Usage"),
            SectionId::Packets => write!(f, "Network Packet Usage"),
            SectionId::TopApplications => write!(f, "Top Applications (Active Connections)"),
            SectionId::Collector => write!(f, "Collector Status"),
        }
    }
}

pub struct SectionLayout {
    pub id: SectionId,
    pub title: String,
    pub collapsed: bool,
}

impl SectionLayout {
    pub fn new(id: SectionId) -> Self {
        Self {
            title: id.to_string(),
            id,
            collapsed: false,
        }
    }

    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }
}

pub struct Layout {
    pub sections: Vec<SectionLayout>,
}

impl Layout {
    /// Default section ordering for the dashboard.
    pub fn default_layout() -> Self {
        Self {
            sections: vec![
                SectionLayout::new(SectionId::Bandwidth),
                SectionLayout::new(SectionId::Packets),
                SectionLayout::new(SectionId::TopApplications),
                SectionLayout::new(SectionId::Collector).collapsed(),
            ],
        }
    }

    pub fn toggle_section(&mut self, id: SectionId) {
        if let Some(s) = self.sections.iter_mut().find(|s| s.id == id) {
            s.collapsed = !s.collapsed;
        }
    }

    /// Toggle by 1-based position, as bound to the number keys.
    pub fn toggle_nth(&mut self, n: usize) -> bool {
        match n.checked_sub(1).and_then(|i| self.sections.get(i)).map(|s| s.id) {
            Some(id) => {
                self.toggle_section(id);
                true
            }
            None => false,
        }
    }

    pub fn is_collapsed(&self, id: SectionId) -> bool {
        self.sections.iter().find(|s| s.id == id).map(|s| s.collapsed).unwrap_or(false)
    }
}
