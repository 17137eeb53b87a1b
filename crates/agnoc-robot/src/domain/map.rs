use agnoc_protocol::Id;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Coordinate {
    pub x: f32,
    pub y: f32,
}

impl Coordinate {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A pose on the map: coordinate plus heading in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub phi: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, phi: f32) -> Self {
        Self { x, y, phi }
    }
}

/// A polygon, e.g. a restricted zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    pub id: Id,
    pub coordinates: Vec<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub id: Id,
    pub name: String,
    pub center: Coordinate,
    pub pixels: Vec<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapHeader {
    pub id: Id,
    pub size: Coordinate,
    pub min: Coordinate,
    pub max: Coordinate,
}

/// Partial map contents carried by one push.
///
/// Rooms and restricted zones are always replaced wholesale: a push without
/// them clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceMapUpdate {
    pub header: Option<MapHeader>,
    pub grid: Option<Vec<u8>>,
    pub robot: Option<Position>,
    pub charger: Option<Position>,
    pub current_spot: Option<Position>,
    pub restricted_zones: Vec<Zone>,
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceMap {
    pub id: Id,
    pub size: Coordinate,
    pub min: Coordinate,
    pub max: Coordinate,
    #[serde(skip)]
    pub grid: Vec<u8>,
    pub robot: Option<Position>,
    pub charger: Option<Position>,
    pub current_spot: Option<Position>,
    pub restricted_zones: Vec<Zone>,
    pub rooms: Vec<Room>,
}

impl DeviceMap {
    /// A map can only be created from a push that carries its header.
    pub fn from_update(update: DeviceMapUpdate) -> Option<Self> {
        let header = update.header?;
        let mut map = Self {
            id: header.id,
            size: header.size,
            min: header.min,
            max: header.max,
            grid: Vec::new(),
            robot: None,
            charger: None,
            current_spot: None,
            restricted_zones: Vec::new(),
            rooms: Vec::new(),
        };
        map.merge(update);
        Some(map)
    }

    pub fn merge(&mut self, update: DeviceMapUpdate) {
        if let Some(header) = update.header {
            self.id = header.id;
            self.size = header.size;
            self.min = header.min;
            self.max = header.max;
        }
        if let Some(grid) = update.grid {
            self.grid = grid;
        }
        self.robot = update.robot.or(self.robot);
        self.charger = update.charger.or(self.charger);
        self.current_spot = update.current_spot.or(self.current_spot);
        self.restricted_zones = update.restricted_zones;
        self.rooms = update.rooms;
    }

    pub fn update_robot(&mut self, position: Position) {
        self.robot = Some(position);
    }

    pub fn update_charger(&mut self, position: Position) {
        self.charger = Some(position);
    }
}
