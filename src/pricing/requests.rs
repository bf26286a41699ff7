//! Request DTOs for quote API endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::models::{Customer, PavementOptions, PavementSurface, ServiceInput, WindowCounts};

/// Request to price or add one service
#[derive(Debug, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum ServiceRequest {
    Windows {
        #[serde(default)]
        small_inside: i64,
        #[serde(default)]
        small_outside: i64,
        #[serde(default)]
        large_inside: i64,
        #[serde(default)]
        large_outside: i64,
        #[serde(default)]
        hard_inside: i64,
        #[serde(default)]
        hard_outside: i64,
    },
    SolarPanels {
        panels: i64,
    },
    Facade {
        #[serde(with = "rust_decimal::serde::str")]
        area_m2: Decimal,
        #[serde(default)]
        impregnate: bool,
    },
    Pavement {
        #[serde(default)]
        surface: SurfaceRequest,
        #[serde(with = "rust_decimal::serde::str")]
        area_m2: Decimal,
        #[serde(default)]
        clean: bool,
        #[serde(default)]
        sand_fill: bool,
        #[serde(default)]
        weed_resistant_sand: bool,
        #[serde(default)]
        coating: bool,
    },
    Transport,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceRequest {
    #[default]
    Driveway,
    Terrace,
    CommercialYard,
}

impl From<SurfaceRequest> for PavementSurface {
    fn from(surface: SurfaceRequest) -> Self {
        match surface {
            SurfaceRequest::Driveway => PavementSurface::Driveway,
            SurfaceRequest::Terrace => PavementSurface::Terrace,
            SurfaceRequest::CommercialYard => PavementSurface::CommercialYard,
        }
    }
}

impl From<ServiceRequest> for ServiceInput {
    fn from(request: ServiceRequest) -> Self {
        match request {
            ServiceRequest::Windows {
                small_inside,
                small_outside,
                large_inside,
                large_outside,
                hard_inside,
                hard_outside,
            } => ServiceInput::Windows(WindowCounts {
                small_inside,
                small_outside,
                large_inside,
                large_outside,
                hard_inside,
                hard_outside,
            }),
            ServiceRequest::SolarPanels { panels } => ServiceInput::SolarPanels { panels },
            ServiceRequest::Facade {
                area_m2,
                impregnate,
            } => ServiceInput::Facade {
                area_m2,
                impregnate,
            },
            ServiceRequest::Pavement {
                surface,
                area_m2,
                clean,
                sand_fill,
                weed_resistant_sand,
                coating,
            } => ServiceInput::Pavement {
                surface: surface.into(),
                area_m2,
                options: PavementOptions {
                    clean,
                    sand_fill,
                    weed_resistant_sand,
                    coating,
                },
            },
            ServiceRequest::Transport => ServiceInput::Transport,
        }
    }
}

/// Request to set customer details
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
}

impl From<CustomerRequest> for Customer {
    fn from(request: CustomerRequest) -> Self {
        Customer {
            name: request.name,
            address: request.address,
            email: request.email,
        }
    }
}
