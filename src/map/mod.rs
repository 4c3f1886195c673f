//! This module defines the maze: tile decoding, grid loading, rule tables and the level catalog.

pub mod catalog;
pub mod direction;
pub mod grid;
pub mod maze;
pub mod tile;
