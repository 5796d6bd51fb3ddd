//! Directory of places to practise a language, shown as map markers.

use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Education,
    Library,
    Center,
    Cafe,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Education,
        ResourceKind::Library,
        ResourceKind::Center,
        ResourceKind::Cafe,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ResourceKind::Education => "Educational institution",
            ResourceKind::Library => "Library",
            ResourceKind::Center => "Cultural center",
            ResourceKind::Cafe => "Language cafe",
        }
    }

    pub fn marker_color(self) -> &'static str {
        match self {
            ResourceKind::Education => "#0d6efd",
            ResourceKind::Library => "#198754",
            ResourceKind::Center => "#6f42c1",
            ResourceKind::Cafe => "#fd7e14",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "education" => Ok(ResourceKind::Education),
            "library" | "libraries" => Ok(ResourceKind::Library),
            "center" | "centers" => Ok(ResourceKind::Center),
            "cafe" | "cafes" => Ok(ResourceKind::Cafe),
            other => Err(AppError::validation(format!("unknown resource kind: {}", other))),
        }
    }
}

/// Comma separated kinds; an absent or blank list means every kind.
pub fn parse_kinds(raw: Option<&str>) -> Result<Vec<ResourceKind>, AppError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(ResourceKind::ALL.to_vec());
    };
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    pub id: u32,
    pub name: &'static str,
    pub kind: ResourceKind,
    pub address: &'static str,
    /// Latitude, longitude.
    pub coordinates: [f64; 2],
    pub working_hours: &'static str,
    pub description: &'static str,
    pub services: &'static str,
}

pub const RESOURCES: &[Resource] = &[
    Resource {
        id: 1,
        name: "Library of Foreign Literature",
        kind: ResourceKind::Library,
        address: "Nikoloyamskaya St, 1",
        coordinates: [55.7445, 37.6464],
        working_hours: "Mon-Fri: 9:00-21:00, Sat-Sun: 10:00-18:00",
        description: "Largest library of literature in foreign languages",
        services: "Books, magazines, language clubs",
    },
    Resource {
        id: 2,
        name: "MSU Russian Language Center",
        kind: ResourceKind::Education,
        address: "Leninskiye Gory, 1",
        coordinates: [55.7039, 37.5286],
        working_hours: "Mon-Fri: 8:00-20:00",
        description: "Russian language courses for foreigners",
        services: "Language courses, testing, consultations",
    },
    Resource {
        id: 3,
        name: "Polyglot Language Club",
        kind: ResourceKind::Education,
        address: "Tverskaya St, 22",
        coordinates: [55.7620, 37.6070],
        working_hours: "Mon-Sun: 10:00-22:00",
        description: "Club for practising foreign languages",
        services: "Conversation clubs, workshops",
    },
    Resource {
        id: 4,
        name: "Language Exchange Cafe",
        kind: ResourceKind::Cafe,
        address: "Arbat St, 45",
        coordinates: [55.7495, 37.5905],
        working_hours: "Mon-Thu: 12:00-23:00, Fri-Sun: 12:00-00:00",
        description: "Cafe for informal language practice",
        services: "Language meetups, games, conversation",
    },
    Resource {
        id: 5,
        name: "International Cultural Center",
        kind: ResourceKind::Center,
        address: "Prospekt Mira, 95",
        coordinates: [55.7877, 37.6338],
        working_hours: "Tue-Sun: 10:00-20:00",
        description: "Center for international cultural exchange",
        services: "Exhibitions, lectures, language courses",
    },
];

pub fn filter_resources<'a>(
    resources: &'a [Resource],
    kinds: &[ResourceKind],
    query: Option<&str>,
) -> Vec<&'a Resource> {
    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    resources
        .iter()
        .filter(|r| kinds.contains(&r.kind))
        .filter(|r| {
            needle.as_ref().is_none_or(|n| {
                r.name.to_lowercase().contains(n) || r.address.to_lowercase().contains(n)
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: [f64; 2],
    pub north_east: [f64; 2],
}

/// Smallest box holding every resource, for fitting the map view.
pub fn bounds(resources: &[&Resource]) -> Option<Bounds> {
    let (first, rest) = resources.split_first()?;
    let init = Bounds {
        south_west: first.coordinates,
        north_east: first.coordinates,
    };
    Some(rest.iter().fold(init, |b, r| {
        let [lat, lon] = r.coordinates;
        Bounds {
            south_west: [b.south_west[0].min(lat), b.south_west[1].min(lon)],
            north_east: [b.north_east[0].max(lat), b.north_east[1].max(lon)],
        }
    }))
}
