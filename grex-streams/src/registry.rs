/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Element factory keyed by registration name.

use crate::error::FactoryError;
use crate::observability::events;
use crate::router::StreamSelector;
use crate::tuntap::TunTap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const STREAM_SELECTOR: &str = "/grex/stream_selector";
pub const TUNTAP: &str = "/grex/tuntap";
/// Reserved for the bit-expansion utility, which is not provided here.
pub const UNPACK_BYTES: &str = "/grex/unpack_bytes";

const COMPONENT: &str = "registry";

/// An element built by [`make_element`].
pub enum Element {
    StreamSelector(StreamSelector),
    TunTap(TunTap),
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Element::StreamSelector(_) => STREAM_SELECTOR,
            Element::TunTap(_) => TUNTAP,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StreamSelectorArgs {
    #[serde(default = "default_item_size")]
    item_size: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TunTapArgs {
    #[serde(default = "default_dev")]
    dev: String,
}

fn default_item_size() -> usize {
    1
}

fn default_dev() -> String {
    "tap%d".to_string()
}

/// Builds the element registered as `name` from its JSON arguments.
///
/// `null` arguments select every default.
pub fn make_element(name: &str, args: &Value) -> Result<Element, FactoryError> {
    let made = match name {
        STREAM_SELECTOR => parse_args::<StreamSelectorArgs>(name, args)
            .map(|args| Element::StreamSelector(StreamSelector::new(args.item_size))),
        TUNTAP => parse_args::<TunTapArgs>(name, args).and_then(|args| {
            TunTap::open(&args.dev)
                .map(Element::TunTap)
                .map_err(FactoryError::from)
        }),
        UNPACK_BYTES => Err(FactoryError::NotProvided(name.to_string())),
        _ => Err(FactoryError::UnknownElement(name.to_string())),
    };

    match &made {
        Ok(_) => debug!(
            event = events::FACTORY_MAKE_OK,
            component = COMPONENT,
            name,
            "element created"
        ),
        Err(err) => warn!(
            event = events::FACTORY_MAKE_FAILED,
            component = COMPONENT,
            name,
            err = %err,
            "element creation failed"
        ),
    }
    made
}

fn parse_args<T: for<'de> Deserialize<'de>>(name: &str, args: &Value) -> Result<T, FactoryError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args.clone()
    };
    serde_json::from_value(args).map_err(|source| FactoryError::InvalidArgs {
        name: name.to_string(),
        source,
    })
}
