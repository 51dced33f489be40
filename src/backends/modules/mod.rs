// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in modules.
//!
//! * input: `generator`
//! * output: `stdout`, `null`
//! * flow: `acknowledge`, `tippingbucket`, `fanout`, `funnel`, `roundrobin`

pub mod acknowledge;
pub mod fanout;
pub mod funnel;
pub mod generator;
pub mod null;
pub mod roundrobin;
pub mod stdout;
pub mod tippingbucket;

pub use acknowledge::Acknowledge;
pub use fanout::Fanout;
pub use funnel::Funnel;
pub use generator::Generator;
pub use null::Null;
pub use roundrobin::RoundRobin;
pub use stdout::Stdout;
pub use tippingbucket::TippingBucket;
