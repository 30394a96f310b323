//! The library code for `blogroll`, a blog listing component. The architecture
//! can be broken down into three steps:
//!
//! 1. Loading posts from a manifest ([`crate::source`]) into a
//!    [`controller::PostListController`]
//! 2. Deriving the visible listing from the controller's state: the category
//!    filter, the current page, and the pagination window
//!    ([`crate::controller`], [`crate::pagination`], [`crate::view`])
//! 3. Rendering the listing ([`crate::render`])
//!
//! The [`widget::Widget`] type ties the three together and re-renders after
//! each user [`controller::Action`]. Loading never fails from the caller's
//! point of view: a manifest that can't be fetched or parsed is logged and
//! treated as an empty post list.
//!
//! The [`crate::feed`] module additionally turns loaded posts into an Atom
//! feed.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod category;
pub mod config;
pub mod controller;
pub mod feed;
pub mod pagination;
pub mod post;
pub mod render;
pub mod source;
pub mod view;
pub mod widget;
