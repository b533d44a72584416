//! Occupancy table printed while employees' reservations are walked

/// Column layout sized to the longest employee and zone names
#[derive(Debug, Clone, Copy)]
pub struct OccupancyTable {
    name_width: usize,
    zone_width: usize,
    total: usize,
}

const PROGRESS_WIDTH: usize = 6;
const DESK_WIDTH: usize = 4;

impl OccupancyTable {
    pub fn new<'a, E, Z>(employees: E, zones: Z) -> Self
    where
        E: IntoIterator<Item = &'a str>,
        Z: IntoIterator<Item = &'a str>,
    {
        let mut total = 0;
        let mut name_width = "Employee name".len();
        for name in employees {
            total += 1;
            name_width = name_width.max(name.chars().count());
        }
        let zone_width = zones
            .into_iter()
            .map(|z| z.chars().count())
            .fold("Zone".len(), usize::max);

        Self {
            name_width,
            zone_width,
            total,
        }
    }

    pub fn header(&self) -> String {
        format!(
            "|{:<pw$}|{:<nw$}|{:<zw$}|Desk|",
            "%",
            "Employee name",
            "Zone",
            pw = PROGRESS_WIDTH,
            nw = self.name_width,
            zw = self.zone_width,
        )
    }

    /// Row for the `index`-th employee; zone and desk are empty when the
    /// employee has no desk that day
    pub fn row(&self, index: usize, employee: &str, seat: Option<(&str, &str)>) -> String {
        let progress = if self.total == 0 {
            0.0
        } else {
            index as f64 / self.total as f64 * 100.0
        };
        let (zone, desk) = seat.unwrap_or_default();
        format!(
            "|{:<pw$}|{:<nw$}|{:<zw$}|{:<dw$}|",
            format!("{progress:.1}%"),
            employee,
            zone,
            desk,
            pw = PROGRESS_WIDTH,
            nw = self.name_width,
            zw = self.zone_width,
            dw = DESK_WIDTH,
        )
    }
}
