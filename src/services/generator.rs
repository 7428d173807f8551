// 题目生成模块
// 四种街机游戏的纯函数生成器：速算、代数、数列、几何
//
// 每个生成器在同一分支内消耗固定次数的随机抽取，调用方可以让
// 五道每日挑战共享同一个种子流而不会错位。

use crate::models::{Difficulty, GameKind, Operator, Problem, SequenceSlot, ShapeKind};
use crate::utils::{rand_int, RandomSource};

/// 几何题模板（静态题库，不做程序化生成）
struct GeometryTemplate {
    shape: ShapeKind,
    question: &'static str,
    options: [&'static str; 4],
    answer: &'static str,
}

const EASY_GEOMETRY: [GeometryTemplate; 4] = [
    GeometryTemplate {
        shape: ShapeKind::Square,
        question: "How many sides does this shape have?",
        options: ["3", "4", "5", "8"],
        answer: "4",
    },
    GeometryTemplate {
        shape: ShapeKind::Circle,
        question: "How many vertices (corners) does this shape have?",
        options: ["0", "1", "2", "4"],
        answer: "0",
    },
    GeometryTemplate {
        shape: ShapeKind::Triangle,
        question: "What is the name of this shape?",
        options: ["Triangle", "Square", "Circle", "Pentagon"],
        answer: "Triangle",
    },
    GeometryTemplate {
        shape: ShapeKind::Square,
        question: "All angles in this shape are...",
        options: ["Acute", "Obtuse", "Right (90°)", "Straight"],
        answer: "Right (90°)",
    },
];

const MEDIUM_GEOMETRY: [GeometryTemplate; 4] = [
    GeometryTemplate {
        shape: ShapeKind::Pentagon,
        question: "How many vertices does a pentagon have?",
        options: ["4", "5", "6", "7"],
        answer: "5",
    },
    GeometryTemplate {
        shape: ShapeKind::Hexagon,
        question: "What is the sum of interior angles in a hexagon?",
        options: ["360°", "540°", "720°", "900°"],
        answer: "720°",
    },
    GeometryTemplate {
        shape: ShapeKind::Triangle,
        question: "What is the sum of angles in any triangle?",
        options: ["90°", "180°", "270°", "360°"],
        answer: "180°",
    },
    GeometryTemplate {
        shape: ShapeKind::Pentagon,
        question: "What is this shape called?",
        options: ["Hexagon", "Octagon", "Square", "Pentagon"],
        answer: "Pentagon",
    },
];

const HARD_GEOMETRY: [GeometryTemplate; 4] = [
    GeometryTemplate {
        shape: ShapeKind::Cube,
        question: "How many faces does a cube have?",
        options: ["4", "6", "8", "12"],
        answer: "6",
    },
    GeometryTemplate {
        shape: ShapeKind::Cube,
        question: "How many edges does a cube have?",
        options: ["6", "8", "10", "12"],
        answer: "12",
    },
    GeometryTemplate {
        shape: ShapeKind::Cube,
        question: "How many vertices does a cube have?",
        options: ["4", "6", "8", "12"],
        answer: "8",
    },
    GeometryTemplate {
        shape: ShapeKind::Square,
        question: "If one side is 5 units, what is the area?",
        options: ["10", "20", "25", "30"],
        answer: "25",
    },
];

/// 生成速算题
///
/// 减法会交换操作数保证结果非负；同难度下乘法使用更小的操作数区间。
pub fn generate_sprint_problem(difficulty: Difficulty, rng: &mut dyn RandomSource) -> Problem {
    let operators: &[Operator] = match difficulty {
        Difficulty::Easy => &[Operator::Add, Operator::Sub],
        Difficulty::Medium | Difficulty::Hard => {
            &[Operator::Add, Operator::Sub, Operator::Mul]
        }
    };
    let operator = operators[rand_int(rng, operators.len() as i64) as usize];

    let (mut num1, mut num2) = match difficulty {
        Difficulty::Easy => (rand_int(rng, 20) + 1, rand_int(rng, 20) + 1),
        Difficulty::Medium => {
            if operator == Operator::Mul {
                (rand_int(rng, 11) + 2, rand_int(rng, 11) + 2) // 2-12
            } else {
                (rand_int(rng, 41) + 10, rand_int(rng, 41) + 10) // 10-50
            }
        }
        Difficulty::Hard => {
            if operator == Operator::Mul {
                (rand_int(rng, 16) + 10, rand_int(rng, 11) + 2) // 10-25 × 2-12
            } else {
                (rand_int(rng, 76) + 25, rand_int(rng, 76) + 25) // 25-100
            }
        }
    };

    let answer = match operator {
        Operator::Add => num1 + num2,
        Operator::Mul => num1 * num2,
        Operator::Sub => {
            if num1 < num2 {
                std::mem::swap(&mut num1, &mut num2);
            }
            num1 - num2
        }
    };

    Problem::Sprint {
        num1,
        num2,
        operator,
        answer,
    }
}

/// 生成代数题
///
/// 方程一律从选定的整数答案反向构造，永远不会出现分数或无理根。
pub fn generate_algebra_problem(difficulty: Difficulty, rng: &mut dyn RandomSource) -> Problem {
    let (equation, answer) = match difficulty {
        // 一步方程
        Difficulty::Easy => {
            let form = rand_int(rng, 3);
            let a = rand_int(rng, 20) + 1;
            let answer = rand_int(rng, 10) + 2; // 2-11
            let equation = if form == 0 {
                format!("x + {} = {}", a, answer + a)
            } else if form == 1 {
                format!("x - {} = {}", a, answer - a)
            } else {
                let multiplier = rand_int(rng, 9) + 2; // 2-10
                format!("{}x = {}", multiplier, multiplier * answer)
            };
            (equation, answer)
        }
        // 两步方程
        Difficulty::Medium => {
            let a = rand_int(rng, 9) + 2; // 2-10
            let b = rand_int(rng, 20) + 1;
            let answer = rand_int(rng, 10) + 2; // 2-11
            let equation = if rng.next() > 0.5 {
                format!("{}x + {} = {}", a, b, a * answer + b)
            } else {
                format!("{}x - {} = {}", a, b, a * answer - b)
            };
            (equation, answer)
        }
        // 两边都有变量；a > c 保证唯一正整数解
        Difficulty::Hard => {
            let c = rand_int(rng, 5) + 2; // 2-6
            let a = c + rand_int(rng, 5) + 2;
            let answer = rand_int(rng, 8) + 2; // 2-9
            let diff = (a - c) * answer;
            let b = rand_int(rng, 20) + 1;
            let d = b + diff;
            (format!("{}x + {} = {}x + {}", a, b, c, d), answer)
        }
    };

    Problem::Algebra { equation, answer }
}

/// 生成数列题
///
/// 五个元素，挖掉下标 1-3 中的一个，首尾永远可见。
pub fn generate_sequence_problem(difficulty: Difficulty, rng: &mut dyn RandomSource) -> Problem {
    const LENGTH: usize = 5;
    let mut sequence: Vec<i64> = Vec::with_capacity(LENGTH);

    match difficulty {
        // 等差数列
        Difficulty::Easy => {
            let start = rand_int(rng, 20) + 1;
            let diff = rand_int(rng, 4) + 2; // 公差 2-5
            for i in 0..LENGTH {
                sequence.push(start + i as i64 * diff);
            }
        }
        // 等差或简单等比
        Difficulty::Medium => {
            if rng.next() > 0.5 {
                let start = rand_int(rng, 50) + 1;
                let diff = rand_int(rng, 9) + 2; // 公差 2-10
                for i in 0..LENGTH {
                    sequence.push(start + i as i64 * diff);
                }
            } else {
                let mut current = rand_int(rng, 5) + 1; // 1-5
                let ratio = rand_int(rng, 2) + 2; // 公比 2 或 3
                for _ in 0..LENGTH {
                    sequence.push(current);
                    current *= ratio;
                }
            }
        }
        // 递减等差、类斐波那契或仿射递推
        Difficulty::Hard => {
            let pattern = rand_int(rng, 3);
            if pattern == 0 {
                let start = rand_int(rng, 50) + 50; // 50-99
                let diff = -(rand_int(rng, 9) + 2); // -2 到 -10
                for i in 0..LENGTH {
                    sequence.push(start + i as i64 * diff);
                }
            } else if pattern == 1 {
                let n1 = rand_int(rng, 5) + 1;
                let n2 = rand_int(rng, 5) + 1 + n1;
                sequence.push(n1);
                sequence.push(n2);
                for i in 2..LENGTH {
                    sequence.push(sequence[i - 1] + sequence[i - 2]);
                }
            } else {
                let mut current = rand_int(rng, 5) + 1;
                let multiplier = rand_int(rng, 3) + 2; // 2-4
                let adder = rand_int(rng, 5) + 1; // 1-5
                for _ in 0..LENGTH {
                    sequence.push(current);
                    current = current * multiplier + adder;
                }
            }
        }
    }

    let missing_index = (rand_int(rng, (LENGTH - 2) as i64) + 1) as usize; // 1、2 或 3
    let answer = sequence[missing_index];

    let display: Vec<SequenceSlot> = sequence
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            if i == missing_index {
                SequenceSlot::gap()
            } else {
                SequenceSlot::Value(v)
            }
        })
        .collect();

    Problem::Sequence {
        sequence: display,
        answer,
    }
}

/// 生成几何题：从对应难度的静态题库里均匀抽一道
pub fn generate_geometry_problem(difficulty: Difficulty, rng: &mut dyn RandomSource) -> Problem {
    let bank: &[GeometryTemplate] = match difficulty {
        Difficulty::Easy => &EASY_GEOMETRY,
        Difficulty::Medium => &MEDIUM_GEOMETRY,
        Difficulty::Hard => &HARD_GEOMETRY,
    };
    let template = &bank[rand_int(rng, bank.len() as i64) as usize];

    Problem::Geometry {
        shape: template.shape,
        question: template.question.to_string(),
        options: template.options.iter().map(|s| s.to_string()).collect(),
        answer: template.answer.to_string(),
    }
}

/// 按游戏类型分发生成器
pub fn generate_problem(
    kind: GameKind,
    difficulty: Difficulty,
    rng: &mut dyn RandomSource,
) -> Problem {
    match kind {
        GameKind::Sprint => generate_sprint_problem(difficulty, rng),
        GameKind::Algebra => generate_algebra_problem(difficulty, rng),
        GameKind::Sequence => generate_sequence_problem(difficulty, rng),
        GameKind::Geometry => generate_geometry_problem(difficulty, rng),
    }
}
