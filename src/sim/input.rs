/// Control intents sampled once at the start of a tick.
///
/// The front end owns key handling; the simulation only ever sees these
/// named booleans. `thrust` through `fire` are held states, `pause` and
/// `restart` are one-shot requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    pub thrust: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub fire: bool,
    /// Flips the pause state. Ignored once the game is over.
    pub pause: bool,
    /// Only honoured once the game is over and the restart cooldown elapsed.
    pub restart: bool,
}

impl Intents {
    pub const IDLE: Intents = Intents {
        thrust: false,
        rotate_left: false,
        rotate_right: false,
        fire: false,
        pause: false,
        restart: false,
    };
}
