//! Tests for the reversi board, moves and results.

use reversi_clash::{Board, Game, GameResult, MoveError, Player, Position};
use std::collections::BTreeSet;

fn pos(notation: &str) -> Position {
    notation.parse().expect("valid notation")
}

/// Plays the first legal move until nobody can move, passing when stuck.
fn play_out(mut game: Game) -> Game {
    for _ in 0..200 {
        if game.result().is_over() {
            break;
        }
        game = match game.board().valid_moves().into_iter().next() {
            Some(mv) => game.play(mv).expect("listed move is legal"),
            None => game.pass(),
        };
    }
    game
}

#[test]
fn test_initial_board_has_four_moves() {
    let moves = Board::initial(Player::Black).valid_moves();
    assert_eq!(moves.len(), 4);
    let expected: BTreeSet<_> = ["d3", "c4", "f5", "e6"].into_iter().map(pos).collect();
    assert_eq!(moves, expected);
}

#[test]
fn test_illegal_moves_leave_board_unchanged() {
    let board = Board::initial(Player::Black);
    let legal = board.valid_moves();
    for candidate in Position::all().filter(|p| !legal.contains(p)) {
        let err = board.play(candidate).unwrap_err();
        if board.is_empty(candidate) {
            assert_eq!(err, MoveError::NoCaptures(candidate));
        } else {
            assert_eq!(err, MoveError::Occupied(candidate));
        }
    }
    assert_eq!(board, Board::initial(Player::Black));
}

#[test]
fn test_move_adds_one_piece_and_flips() {
    let mut game = Game::new(Player::Black);
    for _ in 0..20 {
        let Some(mv) = game.board().valid_moves().into_iter().next() else {
            break;
        };
        let mover = game.board().turn();
        let before = game.board().score();
        let flips = game.board().captures(mv, mover).len();
        let next = game.play(mv).unwrap();
        let after = next.board().score();

        assert!(flips > 0);
        assert_eq!(after.total(), before.total() + 1);
        assert_eq!(after.of(mover), before.of(mover) + 1 + flips);
        assert_eq!(after.of(mover.opponent()), before.of(mover.opponent()) - flips);
        assert_eq!(next.board().turn(), mover.opponent());
        game = next;
    }
}

#[test]
fn test_d3_opening_scenario() {
    let game = Game::new(Player::Black).play(Position::of(2, 3).unwrap()).unwrap();
    let score = game.board().score();
    assert_eq!(score.black, 4);
    assert_eq!(score.white, 1);
    assert_eq!(game.board().turn(), Player::White);
    assert_eq!(game.board().get(pos("d4")), Some(Player::Black));
}

#[test]
fn test_result_ongoing_regardless_of_turn() {
    let game = Game::new(Player::White);
    assert_eq!(game.result(), GameResult::Ongoing);
    assert_eq!(game.pass().result(), GameResult::Ongoing);
}

#[test]
fn test_full_game_terminates_with_consistent_result() {
    let game = play_out(Game::new(Player::Black));
    let result = game.result();
    assert!(result.is_over());
    let board = game.board();
    assert!(board.valid_moves_for(Player::Black).is_empty());
    assert!(board.valid_moves_for(Player::White).is_empty());

    let score = board.score();
    assert_eq!(score.total(), board.occupied());
    match result {
        GameResult::Winner(player) => assert!(score.of(player) > score.of(player.opponent())),
        GameResult::Draw => assert_eq!(score.black, score.white),
        GameResult::Ongoing => unreachable!(),
    }
}

#[test]
fn test_winner_and_draw_on_full_boards() {
    let black_heavy = Board::from_cells(
        Position::all().map(|p| (p, if p.index() < 40 { Player::Black } else { Player::White })),
        Player::White,
    );
    assert_eq!(
        Game::from_board(black_heavy, false).result(),
        GameResult::Winner(Player::Black)
    );

    let even = Board::from_cells(
        Position::all().map(|p| (p, if p.index() % 2 == 0 { Player::Black } else { Player::White })),
        Player::Black,
    );
    assert_eq!(Game::from_board(even, false).result(), GameResult::Draw);
}
