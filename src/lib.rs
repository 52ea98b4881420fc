//=========================================================================
// Tic Engine Library Root
//
// This crate defines the public API surface of the tic engine driver.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the collaborator traits the host implements (simulation,
//   drawing, audio, networking, game lifecycle, input responders)
// - Keep startup, scheduling and presentation logic behind that facade
//
// Typical usage:
// ```no_run
// use tic_engine::prelude::*;
//
// fn main() -> EngineResult<()> {
//     let collaborators: Collaborators = todo!("host subsystems");
//     EngineBuilder::new()
//         .with_options(LaunchOptions::from_toml_file("launch.toml")?)
//         .build(collaborators)?
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the engine subsystems (archives, scheduler, presenter,
// attract loop). It is public so hosts can name collaborator traits and
// data types directly; most applications only need the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the builder, startup hand-off and the run entry point.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
