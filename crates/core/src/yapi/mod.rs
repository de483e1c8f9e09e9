//! Documentation server access: wire model and the [`DocSource`] transport.

mod client;
mod model;

pub use client::{DocSource, LIST_PAGE_LIMIT, YapiClient};
pub use model::{
    Category, Envelope, FormField, HttpMethod, InterfaceDescriptor, InterfacePage,
    InterfaceSummary, PathParam, Project, QueryParam, RequestBodyKind, ResponseBodyKind,
};
