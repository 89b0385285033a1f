use trip_map_itinerary::DayNumber;

/// Stop marker address: day plus 0-based stop index within that day
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId {
    pub day: DayNumber,
    pub index: usize,
}

impl MarkerId {
    pub fn new(day: DayNumber, index: usize) -> Self {
        Self { day, index }
    }

    /// Number printed on the marker (1-based)
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Which marker popup is open. At most one at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkerSelection {
    open: Option<MarkerId>,
}

impl MarkerSelection {
    /// Open `id`, closing whatever was open. Returns the closed marker.
    pub fn select(&mut self, id: MarkerId) -> Option<MarkerId> {
        self.open.replace(id).filter(|previous| *previous != id)
    }

    pub fn close(&mut self) -> Option<MarkerId> {
        self.open.take()
    }

    pub fn open(&self) -> Option<MarkerId> {
        self.open
    }

    pub fn is_open(&self, id: MarkerId) -> bool {
        self.open == Some(id)
    }

    /// Drop the selection if its marker no longer exists
    pub fn retain<F>(&mut self, exists: F)
    where
        F: FnOnce(MarkerId) -> bool,
    {
        if let Some(id) = self.open {
            if !exists(id) {
                self.open = None;
            }
        }
    }
}
