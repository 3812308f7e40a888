/// Number of physical tiles in an Okey deck: 4 colours x 13 ranks x 2 copies
/// plus 2 jokers.
pub const DECK_SIZE: usize = 106;

/// Number of face-down draw piles built before dealing.
pub const PILE_COUNT: usize = 15;

/// Number of seats at a table.
pub const SEAT_COUNT: usize = 4;

/// The pile the server keeps drawing from after the dice result.
pub const BASE_PILE: u8 = 1;

/// Batch size used when the previous snapshot didn't report a count for the
/// pile being dealt.
pub const DEFAULT_DEAL_BATCH: usize = 7;

/// Face visuals provisioned per colour/rank code.
pub const FACE_COPIES: usize = 2;

/// Face visuals provisioned for the joker.
pub const JOKER_COPIES: usize = 2;

/// Colour prefixes of face codes.
pub const COLORS: [char; 4] = ['B', 'G', 'R', 'K'];

/// Highest rank of a coloured tile.
pub const MAX_RANK: u8 = 13;

/// Face code of the wildcard tile.
pub const JOKER_CODE: &str = "JOKER";

/// Separates a face code from its copy discriminator in a tile identity.
pub const COPY_SEPARATOR: char = '-';

/// Shortest flight the animation will run, in seconds.
pub const MIN_FLIGHT_SECONDS: f32 = 0.01;

/// Longest flight the animation will run, in seconds.
pub const MAX_FLIGHT_SECONDS: f32 = 300.0;
