//! Zone map rendering
//!
//! Zones that share a floor plan come back from the service with the very
//! same base image. Those are drawn onto one canvas, so each output file shows
//! every zone of its floor.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use image::{ImageFormat, Rgba, RgbaImage};
use shared::DeskState;
use tracing::{debug, info, instrument};

use crate::draw::{
    self, BUNDLED_FONT, DARK_GREEN, DARK_RED, MIDNIGHT_BLUE, NAME_SIZE, NAME_TILT_DEGREES,
    RING_WIDTH, ZONE_SHADE, ZONE_TITLE,
};
use crate::error::{MapError, MapResult};

/// Written on reserved desks whose holder is not known
const UNKNOWN_OCCUPANT: &str = "Unknown";

/// Desk placement, in fractions of the map size
#[derive(Debug, Clone, PartialEq)]
pub struct DeskMarker {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub state: DeskState,
}

/// One zone with its encoded base map
#[derive(Debug, Clone)]
pub struct ZoneMap {
    pub name: String,
    pub image: Vec<u8>,
    pub desks: Vec<DeskMarker>,
}

/// Zones sharing a pixel-identical base map
#[derive(Debug)]
pub struct MapGroup<'a> {
    pub base: RgbaImage,
    pub zones: Vec<&'a ZoneMap>,
}

impl MapGroup<'_> {
    /// Output file name, taken from the first zone
    pub fn file_name(&self) -> String {
        let name = self.zones.first().map_or("map", |z| z.name.as_str());
        let safe: String = name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{safe}.png")
    }
}

/// Group zones by identical base map, keeping first-seen order
pub fn group_maps(zones: &[ZoneMap]) -> MapResult<Vec<MapGroup<'_>>> {
    let mut groups: Vec<MapGroup<'_>> = Vec::new();
    for zone in zones {
        let base = image::load_from_memory(&zone.image)
            .map_err(|source| MapError::Decode {
                zone: zone.name.clone(),
                source,
            })?
            .to_rgba8();

        match groups
            .iter_mut()
            .find(|g| g.base.dimensions() == base.dimensions() && g.base.as_raw() == base.as_raw())
        {
            Some(group) => group.zones.push(zone),
            None => groups.push(MapGroup {
                base,
                zones: vec![zone],
            }),
        }
    }
    Ok(groups)
}

/// Draws who sits where on a given day
#[derive(Clone)]
pub struct MapRenderer {
    /// desk id -> name of the employee holding it
    occupancy: HashMap<String, String>,
    vip: Vec<String>,
    font: FontArc,
}

impl fmt::Debug for MapRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapRenderer")
            .field("occupancy", &self.occupancy)
            .field("vip", &self.vip)
            .finish_non_exhaustive()
    }
}

impl MapRenderer {
    /// Renderer writing names with the bundled font
    pub fn new(occupancy: HashMap<String, String>, vip: Vec<String>) -> MapResult<Self> {
        Ok(Self {
            occupancy,
            vip,
            font: FontArc::try_from_slice(BUNDLED_FONT)?,
        })
    }

    /// Write names with a TrueType/OpenType font instead
    pub fn with_font(mut self, font: Vec<u8>) -> MapResult<Self> {
        self.font = FontArc::try_from_vec(font)?;
        Ok(self)
    }

    /// Render every map group into `out_dir`, returning the written files
    #[instrument(skip(self, zones), fields(zones = zones.len()))]
    pub fn render(&self, zones: &[ZoneMap], out_dir: &Path) -> MapResult<Vec<PathBuf>> {
        fs::create_dir_all(out_dir)?;

        let groups = group_maps(zones)?;
        info!(groups = groups.len(), "Creating images for the fetched zones");

        let mut written = Vec::with_capacity(groups.len());
        for group in groups {
            let path = out_dir.join(group.file_name());
            let canvas = self.draw_group(&group);
            canvas.save_with_format(&path, ImageFormat::Png)?;
            debug!(path = %path.display(), zones = group.zones.len(), "Map written");
            written.push(path);
        }
        Ok(written)
    }

    /// Annotated copy of the group's base map
    pub fn draw_group(&self, group: &MapGroup<'_>) -> RgbaImage {
        let mut canvas = group.base.clone();
        for zone in &group.zones {
            self.mark_zone(&mut canvas, zone);
            for desk in &zone.desks {
                self.draw_desk(&mut canvas, desk);
            }
        }
        canvas
    }

    fn draw_desk(&self, canvas: &mut RgbaImage, desk: &DeskMarker) {
        let (width, height) = canvas.dimensions();
        let center = (desk.x * f64::from(width), desk.y * f64::from(height));
        // radius is a diameter relative to the map width
        let radius = desk.radius * f64::from(width) / 2.0;

        if desk.state == DeskState::Free {
            draw::ring(canvas, center, radius, RING_WIDTH, MIDNIGHT_BLUE);
        } else {
            let name = self.occupant(&desk.id);
            let color = self.name_color(name);
            draw::label(
                canvas,
                center,
                name,
                &self.font,
                NAME_SIZE,
                NAME_TILT_DEGREES,
                color,
            );
        }
    }

    fn occupant(&self, desk_id: &str) -> &str {
        self.occupancy
            .get(desk_id)
            .map_or(UNKNOWN_OCCUPANT, String::as_str)
    }

    fn name_color(&self, name: &str) -> Rgba<u8> {
        if self.vip.iter().any(|vip| vip == name) {
            DARK_GREEN
        } else {
            DARK_RED
        }
    }

    /// Grey out the bounding box of the zone's desks and write its name across it
    fn mark_zone(&self, canvas: &mut RgbaImage, zone: &ZoneMap) {
        let Some((top_left, bottom_right)) = zone_bounds(canvas, zone) else {
            return;
        };
        draw::shade_rect(canvas, top_left, bottom_right, ZONE_SHADE);
        draw::title(
            canvas,
            top_left,
            bottom_right,
            &zone.name,
            &self.font,
            ZONE_TITLE,
        );
    }
}

/// Pixel corners of the box around the zone's desks
fn zone_bounds(canvas: &RgbaImage, zone: &ZoneMap) -> Option<((f64, f64), (f64, f64))> {
    if zone.desks.is_empty() {
        return None;
    }
    let (width, height) = canvas.dimensions();
    let (width, height) = (f64::from(width), f64::from(height));
    let xs = zone.desks.iter().map(|d| d.x);
    let ys = zone.desks.iter().map(|d| d.y);
    let min_x = xs.clone().fold(f64::INFINITY, f64::min);
    let max_x = xs.fold(f64::NEG_INFINITY, f64::max);
    let min_y = ys.clone().fold(f64::INFINITY, f64::min);
    let max_y = ys.fold(f64::NEG_INFINITY, f64::max);

    Some((
        (min_x * width, min_y * height),
        (max_x * width, max_y * height),
    ))
}
