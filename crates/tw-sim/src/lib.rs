//! `tw-sim` — the world facade simulation components talk to.
//!
//! # Step protocol
//!
//! ```text
//! create_scenery(&scenery)            once per run
//! spawn_agent(blueprint)              any time outside the read phase
//! per step:
//!   ① Read   — components query through WorldInterface and queue changes:
//!                queue_agent_update(agent, AgentUpdate::…)
//!                queue_agent_remove(agent)
//!   ② Apply  — sync_global_data(): drain the queue in FIFO order, then
//!                rebuild every lane assignment from the new poses.
//! reset()                             rerun the same scenery
//! clear()                             drop everything
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | [`world`]     | `World` facade                                    |
//! | [`agent`]     | `AgentRegistry`, `AgentBlueprint`, `Placement`    |
//! | [`update`]    | `AgentUpdate`, `UpdateQueue`                      |
//! | [`interface`] | `WorldInterface` query trait                      |
//! | [`error`]     | `SimError`, `SimResult<T>`                        |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                            |
//! |------------|---------------------------------------------------|
//! | `parallel` | Locates objects on lanes with Rayon during sync.  |
//! | `serde`    | Serde derives on all value types.                 |

pub mod agent;
pub mod error;
pub mod interface;
pub mod update;
pub mod world;


pub use agent::{Agent, AgentBlueprint, AgentRegistry, Placement};
pub use error::{SimError, SimResult};
pub use interface::WorldInterface;
pub use update::{AgentUpdate, Request, UpdateQueue};
pub use world::World;
