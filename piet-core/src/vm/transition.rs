//! Color transition → instruction
//!
//! The instruction is a pure function of the hue and lightness steps between
//! the block being left and the block being entered:
//!
//! ```text
//!              hue step →   0     1         2        3        4            5
//! lightness 0            none   add       divide   greater  duplicate    in(char)
//! lightness 1            push   subtract  modulo   pointer  roll         out(number)
//! lightness 2            pop    multiply  not      switch   in(number)   out(char)
//! ```

use serde::Serialize;

use crate::color::{Color, Hue, Lightness};

use super::instruction::Instruction;

/// `[lightness step][hue step]`
const TRANSITIONS: [[Instruction; Hue::COUNT]; Lightness::COUNT] = {
    use Instruction::*;
    [
        [None, Add, Divide, Greater, Duplicate, InputCharacter],
        [Push, Subtract, Modulo, Pointer, Roll, OutputNumber],
        [Pop, Multiply, Not, Switch, InputNumber, OutputCharacter],
    ]
};

/// Instruction for moving from `current` into `next`
///
/// Transitions to or from white and black are no-ops.
pub fn resolve(current: Color, next: Color) -> Instruction {
    let (Some((from_l, from_h)), Some((to_l, to_h))) = (current.coordinates(), next.coordinates())
    else {
        return Instruction::None;
    };

    let hue_step = (to_h.index() + Hue::COUNT - from_h.index()) % Hue::COUNT;
    let lightness_step = (to_l.index() + Lightness::COUNT - from_l.index()) % Lightness::COUNT;
    TRANSITIONS[lightness_step][hue_step]
}

/// One cell of the instruction palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub color: Color,
    pub instruction: Instruction,
}

/// Instruction reached from `current` for each chromatic color
///
/// Indexed `[lightness][hue]` in palette order, the layout editors show next
/// to the color picker. Every entry is `none` when `current` is achromatic.
pub fn palette(current: Color) -> [[PaletteEntry; Hue::COUNT]; Lightness::COUNT] {
    Lightness::ALL.map(|lightness| {
        Hue::ALL.map(|hue| {
            let color = Color::chromatic(lightness, hue);
            PaletteEntry {
                color,
                instruction: resolve(current, color),
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_color_is_noop() {
        for color in Color::ALL {
            assert_eq!(resolve(color, color), Instruction::None, "{color}");
        }
    }

    #[test]
    fn test_achromatic_is_noop() {
        for color in Color::ALL {
            assert_eq!(resolve(Color::White, color), Instruction::None);
            assert_eq!(resolve(color, Color::White), Instruction::None);
            assert_eq!(resolve(color, Color::Black), Instruction::None);
        }
    }

    #[test]
    fn test_known_transitions() {
        assert_eq!(resolve(Color::LightRed, Color::Red), Instruction::Push);
        assert_eq!(resolve(Color::LightRed, Color::DarkRed), Instruction::Pop);
        assert_eq!(resolve(Color::Red, Color::Yellow), Instruction::Add);
        assert_eq!(resolve(Color::Red, Color::DarkYellow), Instruction::Subtract);
        assert_eq!(resolve(Color::Red, Color::LightYellow), Instruction::Multiply);
        assert_eq!(resolve(Color::Blue, Color::Red), Instruction::Divide);
        assert_eq!(resolve(Color::DarkMagenta, Color::LightRed), Instruction::Subtract);
        assert_eq!(resolve(Color::Red, Color::Green), Instruction::Divide);
        assert_eq!(resolve(Color::Red, Color::Magenta), Instruction::InputCharacter);
        assert_eq!(resolve(Color::Red, Color::DarkMagenta), Instruction::OutputNumber);
        assert_eq!(resolve(Color::Red, Color::LightMagenta), Instruction::OutputCharacter);
        assert_eq!(resolve(Color::DarkGreen, Color::LightBlue), Instruction::Modulo);
        assert_eq!(resolve(Color::Red, Color::DarkBlue), Instruction::Roll);
        assert_eq!(resolve(Color::Red, Color::Blue), Instruction::Duplicate);
    }

    #[test]
    fn test_every_cell_from_light_red() {
        use Instruction::*;
        // light red sits at (0, 0), so palette indices are the steps
        let expected = [
            [None, Add, Divide, Greater, Duplicate, InputCharacter],
            [Push, Subtract, Modulo, Pointer, Roll, OutputNumber],
            [Pop, Multiply, Not, Switch, InputNumber, OutputCharacter],
        ];

        let table = palette(Color::LightRed);
        for (l, row) in table.iter().enumerate() {
            for (h, entry) in row.iter().enumerate() {
                assert_eq!(entry.instruction, expected[l][h], "step ({l}, {h})");
            }
        }
    }

    #[test]
    fn test_offsets_are_cyclic() {
        // every (lightness, hue) step is reachable from every chromatic start
        for start in Color::ALL.into_iter().filter(|c| c.is_chromatic()) {
            let mut seen: Vec<Instruction> = palette(start)
                .iter()
                .flatten()
                .map(|entry| entry.instruction)
                .collect();
            seen.sort_by_key(|i| i.name());
            seen.dedup();
            assert_eq!(seen.len(), 18, "{start}");
        }
    }

    #[test]
    fn test_palette_layout() {
        let table = palette(Color::Red);
        assert_eq!(table[0][0].color, Color::LightRed);
        assert_eq!(table[0][0].instruction, Instruction::Pop);
        assert_eq!(table[1][0].instruction, Instruction::None);
        assert_eq!(table[2][1].color, Color::DarkYellow);
        assert_eq!(table[2][1].instruction, Instruction::Subtract);

        let blank = palette(Color::White);
        assert!(blank.iter().flatten().all(|e| e.instruction == Instruction::None));
    }
}
