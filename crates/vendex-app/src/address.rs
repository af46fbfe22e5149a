// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;

use crate::forms::FormDraft;

const ROAD_ADDRESS: &str = "R";

/// Completion payload of the postal-code lookup widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressLookupResult {
    pub road_address: String,
    pub jibun_address: String,
    pub zonecode: String,
    pub address_type: String,
    pub bname: String,
    pub building_name: String,
    pub user_selected_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFill {
    pub postal_code: String,
    pub primary_address: String,
    pub detailed_address: String,
}

pub fn complete(result: &AddressLookupResult) -> AddressFill {
    let primary_address = if result.user_selected_type == ROAD_ADDRESS {
        road_address_with_extras(result)
    } else {
        result.jibun_address.clone()
    };

    AddressFill {
        postal_code: result.zonecode.clone(),
        primary_address,
        detailed_address: String::new(),
    }
}

fn road_address_with_extras(result: &AddressLookupResult) -> String {
    let mut full = result.road_address.clone();
    if result.address_type != ROAD_ADDRESS {
        return full;
    }

    let extras: Vec<&str> = [result.bname.as_str(), result.building_name.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if !extras.is_empty() {
        full.push_str(&format!(" ({})", extras.join(", ")));
    }
    full
}

impl FormDraft {
    pub fn apply_address(&mut self, fill: AddressFill) {
        self.postal_code = fill.postal_code;
        self.primary_address = fill.primary_address;
        self.detailed_address = fill.detailed_address;
    }
}
