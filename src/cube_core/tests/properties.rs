use std::time::Duration;

use cube_core::{
    Color, CubeError, Face, LatticePos, Move, Puzzle, RotationStatus, SequencePlayer, Turns,
    geometry::Direction,
    method::{CannedScramble, beginner_steps},
    notation::{format_sequence, invert, parse, parse_sequence},
};

fn all_moves() -> impl Iterator<Item = Move> {
    Face::ALL.into_iter().flat_map(|face| {
        [Turns::Clockwise, Turns::CounterClockwise, Turns::Half]
            .map(|turns| Move::new(face, turns))
    })
}

fn scrambled() -> Puzzle {
    let mut puzzle = Puzzle::new();
    puzzle
        .apply_notation("R' F2 U D' B L2 F' R U2")
        .unwrap();
    puzzle
}

#[test_log::test]
fn move_then_inverse_restores() {
    for mv in all_moves() {
        let mut puzzle = scrambled();
        let before = puzzle.model().snapshot().unwrap();

        puzzle.apply(mv).unwrap();
        puzzle.apply(invert(mv)).unwrap();

        assert_eq!(puzzle.model().snapshot().unwrap(), before, "{mv}");
    }
}

#[test]
fn four_turns_restore() {
    for mv in all_moves() {
        let mut puzzle = scrambled();
        let before = puzzle.model().snapshot().unwrap();

        for _ in 0..4 {
            puzzle.apply(mv).unwrap();
        }

        assert_eq!(puzzle.model().snapshot().unwrap(), before, "{mv}");
    }
}

#[test]
fn formatting_canonicalizes() {
    for (input, canonical) in [
        ("r", "R"),
        ("u'", "U'"),
        ("F2", "F2"),
        ("b2", "B2"),
    ] {
        assert_eq!(parse(input).unwrap().to_string(), canonical);
    }

    let moves = parse_sequence("  R   u'\tF2\n d ").unwrap();
    assert_eq!(format_sequence(&moves), "R U' F2 D");

    assert_eq!(invert(parse("R2").unwrap()).to_string(), "R2");
}

#[test]
fn reset_paints_the_standard_scheme() {
    let mut puzzle = scrambled();
    puzzle.reset().unwrap();
    let report = puzzle.describe().unwrap();

    for (face, color) in [
        (Face::U, Color::White),
        (Face::F, Color::Green),
        (Face::R, Color::Red),
        (Face::L, Color::Orange),
        (Face::B, Color::Blue),
        (Face::D, Color::Yellow),
    ] {
        assert_eq!(report.face(face), Some([color; 9]), "{face}");
    }
}

#[test]
fn r_turns_the_top_front_right_corner() {
    let mut puzzle = Puzzle::new();
    puzzle.apply(parse("R").unwrap()).unwrap();
    let report = puzzle.describe().unwrap();

    assert_eq!(
        report.sticker(LatticePos::new(1, 1, -1), Direction::PosY),
        Some(Color::Green)
    );
    assert_eq!(
        report.sticker(LatticePos::new(1, 1, -1), Direction::NegZ),
        Some(Color::White)
    );
    assert_eq!(
        report.sticker(LatticePos::new(1, 1, -1), Direction::PosX),
        Some(Color::Red)
    );
}

#[test]
fn invalid_tokens_change_nothing() {
    let mut puzzle = scrambled();
    let before = puzzle.model().snapshot().unwrap();

    assert!(parse("X").is_err());
    assert!(matches!(
        puzzle.apply_notation("X"),
        Err(CubeError::SequenceToken { index: 0, .. })
    ));
    assert!(puzzle.apply_notation("R U R2' F").is_err());

    assert_eq!(puzzle.model().snapshot().unwrap(), before);
}

#[test_log::test]
fn player_round_trip() {
    let mut puzzle = scrambled();
    let before = puzzle.model().snapshot().unwrap();

    let mut player = SequencePlayer::new(Duration::from_millis(120));
    player.load(parse_sequence("L2 D F' B U2 R").unwrap());

    let frame = Duration::from_millis(16);
    let drive = |puzzle: &mut Puzzle| {
        while puzzle.tick(frame) != RotationStatus::Idle {}
    };

    while player.advance(&mut puzzle).unwrap().is_some() {
        drive(&mut puzzle);
    }
    assert_eq!(player.progress(), (6, 6));
    assert_ne!(puzzle.model().snapshot().unwrap(), before);

    while player.retreat(&mut puzzle).unwrap().is_some() {
        drive(&mut puzzle);
    }
    assert_eq!(player.cursor(), -1);
    assert_eq!(puzzle.model().snapshot().unwrap(), before);
}

#[test]
fn animated_and_instant_agree() {
    let moves = parse_sequence("F R' U2 L D' B2").unwrap();

    let mut instant = Puzzle::new();
    instant.apply_all(&moves).unwrap();

    let mut animated = Puzzle::new();
    for mv in &moves {
        animated.begin_move(*mv, Duration::from_millis(250)).unwrap();
        loop {
            match animated.tick(Duration::from_millis(33)) {
                RotationStatus::Completed(done) => {
                    assert_eq!(done, *mv);
                    break;
                }
                RotationStatus::InProgress { .. } => {}
                RotationStatus::Idle => panic!("{mv} never completed"),
            }
        }
    }

    assert_eq!(
        animated.model().snapshot().unwrap(),
        instant.model().snapshot().unwrap()
    );
    assert_eq!(
        animated.describe().unwrap().to_facelet_string(),
        instant.describe().unwrap().to_facelet_string()
    );
}

#[test]
fn canned_scramble_then_solution_solves() {
    let steps = beginner_steps();
    let scramble = CannedScramble::new(&steps).unwrap();

    let mut puzzle = Puzzle::new();
    puzzle.apply_all(&scramble.moves()).unwrap();
    assert!(!puzzle.describe().unwrap().is_solved());

    let mut player = SequencePlayer::new(Duration::ZERO);
    player.load(scramble.solution().to_vec());
    while player.advance(&mut puzzle).unwrap().is_some() {}

    assert!(puzzle.describe().unwrap().is_solved());
    puzzle.model().verify().unwrap();
}
