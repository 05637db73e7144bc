//! Line-oriented text protocol spoken with the match referee.

use std::{
    error::Error,
    fmt::{self, Write as _},
    io::{self, BufRead},
};

use glam::IVec2;
use royale_core::{
    BarracksKind, Blueprint, CodeError, Move, Owner, QueenAction, SiteGeometry, SiteId, Structure,
    StructureKind, Unit, UnitKind,
};
use royale_world::{SiteReport, TurnInput};

/// Sentinel the referee uses for numeric fields without a value.
const ABSENT: i32 = -1;

/// Reader decoding the initial layout block and the per-turn blocks.
#[derive(Debug)]
pub(crate) struct ProtocolReader<R> {
    input: R,
    line: usize,
    buffer: String,
}

impl<R: BufRead> ProtocolReader<R> {
    /// Wraps a buffered input stream.
    pub(crate) fn new(input: R) -> Self {
        Self {
            input,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Decodes the site layout sent once before the first turn.
    pub(crate) fn read_sites(&mut self) -> Result<Vec<SiteGeometry>, ProtocolError> {
        let [count] = self.require("site count")?;
        let count = self.count(count)?;
        let mut sites = Vec::with_capacity(count);
        for _ in 0..count {
            let [id, x, y, radius] = self.require("site layout")?;
            sites.push(SiteGeometry::new(
                SiteId::new(self.unsigned(id)?),
                IVec2::new(x, y),
                self.unsigned(radius)?,
            ));
        }
        Ok(sites)
    }

    /// Decodes one turn block, or `None` once the referee closes the stream.
    pub(crate) fn read_turn(
        &mut self,
        site_count: usize,
    ) -> Result<Option<TurnInput>, ProtocolError> {
        let Some([gold, touched]) = self.record("turn header")? else {
            return Ok(None);
        };

        let mut sites = Vec::with_capacity(site_count);
        for _ in 0..site_count {
            let [id, site_gold, max_mine_size, structure, owner, param1, param2] =
                self.require("site state")?;
            sites.push(SiteReport {
                id: SiteId::new(self.unsigned(id)?),
                owner: Owner::from_code(owner)?,
                structure: decode_structure(structure, param1, param2)?,
                gold: optional(site_gold),
                max_mine_size: optional(max_mine_size),
            });
        }

        let [count] = self.require("unit count")?;
        let count = self.count(count)?;
        let mut units = Vec::with_capacity(count);
        for _ in 0..count {
            let [x, y, owner, kind, health] = self.require("unit")?;
            units.push(Unit {
                position: IVec2::new(x, y),
                owner: Owner::from_code(owner)?,
                kind: UnitKind::from_code(kind)?,
                health: absent_as_zero(health),
            });
        }

        Ok(Some(TurnInput {
            gold: absent_as_zero(gold),
            touched_site: if touched == ABSENT {
                None
            } else {
                Some(SiteId::new(self.unsigned(touched)?))
            },
            sites,
            units,
        }))
    }

    fn require<const N: usize>(&mut self, what: &'static str) -> Result<[i32; N], ProtocolError> {
        self.record(what)?.ok_or(ProtocolError::UnexpectedEnd { what })
    }

    fn record<const N: usize>(
        &mut self,
        what: &'static str,
    ) -> Result<Option<[i32; N]>, ProtocolError> {
        self.buffer.clear();
        if self.input.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        let mut fields = self.buffer.split_whitespace();
        let mut values = [0; N];
        for value in &mut values {
            let field = fields.next().ok_or(ProtocolError::ShortRecord {
                line: self.line,
                what,
            })?;
            *value = field.parse().map_err(|_| ProtocolError::InvalidNumber {
                line: self.line,
                value: field.to_owned(),
            })?;
        }
        if fields.next().is_some() {
            return Err(ProtocolError::TrailingFields {
                line: self.line,
                what,
            });
        }
        Ok(Some(values))
    }

    fn count(&self, value: i32) -> Result<usize, ProtocolError> {
        usize::try_from(value).map_err(|_| ProtocolError::Negative {
            line: self.line,
            value,
        })
    }

    fn unsigned(&self, value: i32) -> Result<u32, ProtocolError> {
        u32::try_from(value).map_err(|_| ProtocolError::Negative {
            line: self.line,
            value,
        })
    }
}

fn optional(value: i32) -> Option<u32> {
    u32::try_from(value).ok()
}

fn absent_as_zero(value: i32) -> u32 {
    optional(value).unwrap_or(0)
}

fn decode_structure(code: i32, param1: i32, param2: i32) -> Result<Structure, CodeError> {
    Ok(match StructureKind::from_code(code)? {
        StructureKind::Empty => Structure::Empty,
        StructureKind::Mine => Structure::Mine {
            income_rate: absent_as_zero(param1),
        },
        StructureKind::Tower => Structure::Tower {
            health: absent_as_zero(param1),
            attack_radius: absent_as_zero(param2),
        },
        StructureKind::Barracks => Structure::Barracks {
            kind: BarracksKind::from_code(param2)?,
            turns_until_train: absent_as_zero(param1),
        },
    })
}

/// Renders a move as the two command lines expected by the referee.
#[must_use]
pub(crate) fn encode(decision: &Move) -> String {
    let mut out = match decision.queen {
        None => String::from("WAIT"),
        Some(QueenAction::Move { target }) => format!("MOVE {} {}", target.x, target.y),
        Some(QueenAction::Build { site, blueprint }) => {
            format!("BUILD {} {}", site.get(), blueprint_name(blueprint))
        }
    };
    out.push_str("\nTRAIN");
    for site in &decision.train {
        let _ = write!(out, " {}", site.get());
    }
    out
}

fn blueprint_name(blueprint: Blueprint) -> &'static str {
    match blueprint {
        Blueprint::Mine => "MINE",
        Blueprint::Tower => "TOWER",
        Blueprint::Barracks(BarracksKind::Knight) => "BARRACKS-KNIGHT",
        Blueprint::Barracks(BarracksKind::Archer) => "BARRACKS-ARCHER",
        Blueprint::Barracks(BarracksKind::Giant) => "BARRACKS-GIANT",
    }
}

/// Errors raised while decoding referee input.
#[derive(Debug)]
pub(crate) enum ProtocolError {
    /// The underlying stream failed.
    Io(io::Error),
    /// The stream ended in the middle of a block.
    UnexpectedEnd {
        /// Record that was expected next.
        what: &'static str,
    },
    /// A record carried fewer fields than its layout requires.
    ShortRecord {
        /// One-based input line.
        line: usize,
        /// Record being decoded.
        what: &'static str,
    },
    /// A record carried more fields than its layout allows.
    TrailingFields {
        /// One-based input line.
        line: usize,
        /// Record being decoded.
        what: &'static str,
    },
    /// A field was not an integer.
    InvalidNumber {
        /// One-based input line.
        line: usize,
        /// Offending text.
        value: String,
    },
    /// A count or identifier was negative.
    Negative {
        /// One-based input line.
        line: usize,
        /// Offending value.
        value: i32,
    },
    /// An enumeration code is not part of the protocol.
    UnknownCode(CodeError),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(f, "could not read referee input: {error}"),
            Self::UnexpectedEnd { what } => write!(f, "input ended while expecting {what}"),
            Self::ShortRecord { line, what } => {
                write!(f, "line {line}: {what} record is missing fields")
            }
            Self::TrailingFields { line, what } => {
                write!(f, "line {line}: {what} record has unexpected extra fields")
            }
            Self::InvalidNumber { line, value } => {
                write!(f, "line {line}: '{value}' is not an integer")
            }
            Self::Negative { line, value } => {
                write!(f, "line {line}: {value} must not be negative")
            }
            Self::UnknownCode(error) => write!(f, "{error}"),
        }
    }
}

impl Error for ProtocolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::UnknownCode(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<CodeError> for ProtocolError {
    fn from(error: CodeError) -> Self {
        Self::UnknownCode(error)
    }
}
