//! Per-level storage of the player's graphs
//!
//! Each graph keeps its id and color for as long as it exists, even when its
//! equation is edited. Ids of removed graphs are handed out again so ids (and
//! therefore colors) stay small.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::expr::Function;

/// Stable handle to a registered graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphId(pub u32);

/// Display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Convert from hue (degrees), saturation and value (0-1)
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = value * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = value - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
        }
    }
}

/// Maximally distinct colors, indexed by graph id
const PALETTE: [u32; 64] = [
    0x000000, 0x00FF00, 0x0000FF, 0xFF0000, 0x01FFFE, 0xFFA6FE, 0xFFDB66, 0x006401, 0x010067,
    0x95003A, 0x007DB5, 0xFF00F6, 0xFFEEE8, 0x774D00, 0x90FB92, 0x0076FF, 0xD5FF00, 0xFF937E,
    0x6A826C, 0xFF029D, 0xFE8900, 0x7A4782, 0x7E2DD2, 0x85A900, 0xFF0056, 0xA42400, 0x00AE7E,
    0x683D3B, 0xBDC6FF, 0x263400, 0xBDD393, 0x00B917, 0x9E008E, 0x001544, 0xC28C9F, 0xFF74A3,
    0x01D0FF, 0x004754, 0xE56FFE, 0x788231, 0x0E4CA1, 0x91D0CB, 0xBE9970, 0x968AE8, 0xBB8800,
    0x43002C, 0xDEFF74, 0x00FFC6, 0xFFE502, 0x620E00, 0x008F9C, 0x98FF52, 0x7544B1, 0xB500FF,
    0x00FF78, 0xFF6E41, 0x005F39, 0x6B6882, 0x5FAD4E, 0xA75740, 0xA5FFD2, 0xFFB167, 0x009BFF,
    0xE85EBE,
];

/// Color for a graph id. Ids past the palette get a saturated color with a
/// pseudo-random hue, seeded by the id so it is stable.
pub fn color_for(id: GraphId) -> Rgb {
    match PALETTE.get(id.0 as usize) {
        Some(&hex) => Rgb::from_hex(hex),
        None => {
            let mut rng = Pcg32::seed_from_u64(id.0 as u64);
            Rgb::from_hsv(rng.random_range(0.0..360.0), 1.0, 0.85)
        }
    }
}

/// A function entered by the player
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    id: GraphId,
    function: Function,
    color: Rgb,
}

impl Graph {
    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn color(&self) -> Rgb {
        self.color
    }
}

/// Graphs registered for the current level, in registration order
#[derive(Debug, Clone, Default)]
pub struct GraphStorage {
    graphs: Vec<Graph>,
    recycled: Vec<u32>,
    next_id: u32,
}

impl GraphStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, function: Function) -> GraphId {
        let id = GraphId(self.allocate_id());
        self.graphs.push(Graph {
            id,
            function,
            color: color_for(id),
        });
        log::debug!("Added graph {} ({} total)", id.0, self.graphs.len());
        id
    }

    /// Remove a graph, freeing its id. Returns false if it wasn't registered.
    pub fn remove(&mut self, id: GraphId) -> bool {
        let Some(index) = self.graphs.iter().position(|g| g.id == id) else {
            return false;
        };
        self.graphs.remove(index);
        self.recycled.push(id.0);
        log::debug!("Removed graph {}", id.0);
        true
    }

    /// Swap in an edited function without changing id or color
    pub fn replace(&mut self, id: GraphId, function: Function) -> bool {
        match self.graphs.iter_mut().find(|g| g.id == id) {
            Some(graph) => {
                graph.function = function;
                log::debug!("Replaced function of graph {}", id.0);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: GraphId) -> Option<&Graph> {
        self.graphs.iter().find(|g| g.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Graph> {
        self.graphs.iter()
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    fn allocate_id(&mut self) -> u32 {
        if let Some(id) = self.recycled.pop() {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
