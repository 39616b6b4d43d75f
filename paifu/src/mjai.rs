//! Export of a [`Record`] as an mjai event stream.

use crate::record::{Record, RoundEnd};
use crate::{Event as RecordEvent, Tile};

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Describes an event in mjai format.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum Event {
    StartGame {
        kyoku_first: u8, // hanchan = 0, tonpuu = 4
        aka_flag: bool,
        names: [String; 4],
    },
    StartKyoku {
        bakaze: Tile,
        dora_marker: Tile,
        kyoku: u8, // counts from 1
        honba: u8,
        kyotaku: u8,
        oya: u8,
        scores: [i32; 4],
        tehais: [[Tile; 13]; 4],
    },

    Tsumo {
        actor: u8,
        pai: Tile,
    },
    Dahai {
        actor: u8,
        pai: Tile,
        tsumogiri: bool,
    },

    Chi {
        actor: u8,
        target: u8,
        pai: Tile,
        consumed: [Tile; 2],
    },
    Pon {
        actor: u8,
        target: u8,
        pai: Tile,
        consumed: [Tile; 2],
    },
    Daiminkan {
        actor: u8,
        target: u8,
        pai: Tile,
        consumed: [Tile; 3],
    },
    Kakan {
        actor: u8,
        pai: Tile,
        consumed: [Tile; 3],
    },
    Ankan {
        actor: u8,
        consumed: [Tile; 4],
    },
    Dora {
        dora_marker: Tile,
    },

    Reach {
        actor: u8,
    },
    ReachAccepted {
        actor: u8,
    },

    Hora {
        actor: u8,
        target: u8,
        deltas: Option<[i32; 4]>,
        ura_markers: Option<Vec<Tile>>,
    },
    Ryukyoku {
        deltas: Option<[i32; 4]>,
    },

    EndKyoku,
    EndGame,
}

impl Event {
    #[must_use]
    pub const fn naki_target(&self) -> Option<u8> {
        match *self {
            Self::Chi { target, .. } | Self::Pon { target, .. } | Self::Daiminkan { target, .. } => {
                Some(target)
            }
            _ => None,
        }
    }
}

/// Maps an in-round action; the settlement is taken from `Round::end`,
/// which carries the deltas.
fn action(ev: &RecordEvent) -> Option<Event> {
    let ev = match *ev {
        RecordEvent::Tsumo { actor, pai } => Event::Tsumo { actor, pai },
        RecordEvent::Dahai {
            actor,
            pai,
            tsumogiri,
        } => Event::Dahai {
            actor,
            pai,
            tsumogiri,
        },
        RecordEvent::Chi {
            actor,
            target,
            pai,
            consumed,
        } => Event::Chi {
            actor,
            target,
            pai,
            consumed,
        },
        RecordEvent::Pon {
            actor,
            target,
            pai,
            consumed,
        } => Event::Pon {
            actor,
            target,
            pai,
            consumed,
        },
        RecordEvent::Daiminkan {
            actor,
            target,
            pai,
            consumed,
        } => Event::Daiminkan {
            actor,
            target,
            pai,
            consumed,
        },
        RecordEvent::Kakan {
            actor,
            pai,
            consumed,
        } => Event::Kakan {
            actor,
            pai,
            consumed,
        },
        RecordEvent::Ankan { actor, consumed } => Event::Ankan { actor, consumed },
        RecordEvent::Dora { dora_marker } => Event::Dora { dora_marker },
        RecordEvent::Reach { actor } => Event::Reach { actor },
        RecordEvent::ReachAccepted { actor } => Event::ReachAccepted { actor },
        RecordEvent::Hora { .. } | RecordEvent::Ryukyoku { .. } => return None,
    };
    Some(ev)
}

impl Record {
    /// Flattens the record into the mjai event stream, from `start_game` to
    /// `end_game`.
    #[must_use]
    pub fn to_mjai_events(&self) -> Vec<Event> {
        let mut events = vec![Event::StartGame {
            kyoku_first: self.meta.game_length as u8,
            aka_flag: self.meta.has_aka,
            names: self.meta.names.clone(),
        }];

        for round in &self.rounds {
            events.push(Event::StartKyoku {
                bakaze: round.bakaze,
                dora_marker: round.dora_marker,
                kyoku: round.kyoku,
                honba: round.honba,
                kyotaku: round.kyotaku,
                oya: round.oya,
                scores: round.scores,
                tehais: round.tehais,
            });
            events.extend(round.events.iter().filter_map(action));

            match &round.end {
                RoundEnd::Hora { wins, ura_markers } => {
                    events.extend(wins.iter().map(|win| Event::Hora {
                        actor: win.actor,
                        target: win.target,
                        deltas: Some(win.deltas),
                        ura_markers: Some(ura_markers.clone()),
                    }));
                }
                RoundEnd::Ryukyoku { deltas, .. } => {
                    events.push(Event::Ryukyoku {
                        deltas: Some(*deltas),
                    });
                }
            }
            events.push(Event::EndKyoku);
        }

        events.push(Event::EndGame);
        events
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_shape() {
        let ev = Event::Hora {
            actor: 2,
            target: 1,
            deltas: Some([0, -3900, 4900, 0]),
            ura_markers: None,
        };
        assert_eq!(
            serde_json::to_value(&ev).unwrap(),
            json!({"type": "hora", "actor": 2, "target": 1, "deltas": [0, -3900, 4900, 0]})
        );
        assert_eq!(
            serde_json::to_string(&Event::EndKyoku).unwrap(),
            r#"{"type":"end_kyoku"}"#
        );

        let ev: Event =
            serde_json::from_str(r#"{"type":"pon","actor":3,"target":1,"pai":"P","consumed":["P","P"]}"#)
                .unwrap();
        assert_eq!(ev.naki_target(), Some(1));
    }
}
