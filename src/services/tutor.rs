//! AI 导师服务模块
//! 面向生成式文本接口的客户端：提示词工程、测验判卷与流式输出

use crate::models::{Difficulty, QuizGrade, QuizProblem, QuizQuestionResult};
use anyhow::{anyhow, Context, Result};
use async_stream::stream;
use futures::stream::Stream;
use futures::StreamExt;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 系统提示词：约束 AI 始终以数学老师的身份作答
const SYSTEM_INSTRUCTION: &str = r#"You are Math Mentor AI, an expert and friendly math teacher. Your goal is to help students understand mathematical concepts in a clear, encouraging, and engaging way.

Follow these rules strictly:
1.  **Be a Teacher, Not a Calculator:** Don't just give answers. Explain the concepts, show the step-by-step process, and guide the user to the solution.
2.  **Use Markdown and LaTeX:** Format your responses using markdown for clarity. For all mathematical expressions, equations, and symbols, use LaTeX syntax. Wrap inline math with single dollar signs and block-level equations with double dollar signs. This is critical for proper rendering.
3.  **Encouraging Tone:** Use a positive and patient tone. Phrases like "Great question!", "Let's break it down," and "You're on the right track!" are encouraged.
4.  **Clarity is Key:** Simplify complex topics. Use analogies and real-world examples where applicable.
5.  **Interactive Learning:** When appropriate, ask the user questions to check their understanding before moving on."#;

/// 导师会话模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorMode {
    Lesson,
    Review,
    Challenge,
    Practice,
}

impl TutorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TutorMode::Lesson => "Lesson",
            TutorMode::Review => "Review",
            TutorMode::Challenge => "Challenge",
            TutorMode::Practice => "Practice",
        }
    }
}

/// 导师客户端配置
#[derive(Debug, Clone)]
pub struct TutorConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
        }
    }
}

// ==================== 提示词工程 ====================

/// 导师提示词构造器
pub struct TutorPrompt;

impl TutorPrompt {
    /// 按主题和难度生成入门课程的提示词
    pub fn lesson(topic: &str, difficulty: Difficulty) -> String {
        format!(
            r#"Generate a concise and clear introductory lesson on the topic of "{topic}" with a difficulty level of "{difficulty}".
Tailor the complexity of the explanation, the depth of the concepts, and the difficulty of the example and practice problems to this level.
- For "Easy", use simple language, basic examples, and avoid jargon.
- For "Medium", assume some prior knowledge and use standard terminology.
- For "Hard", introduce more advanced concepts, use formal notation, and provide a more challenging practice problem.

Your lesson should be structured with: an engaging introduction, a "Key Concepts" section, a clear, step-by-step "Example Problem", and a final "Practice Problem" for the user. Encourage them to ask for help.

Follow formatting rules strictly:
- Use Markdown for headings, lists, and bold text.
- For ALL mathematical expressions, equations, and symbols, use LaTeX syntax. Wrap inline math with single dollar signs and block-level equations with double dollar signs. This is critical.
- Maintain an encouraging and accessible tone."#,
            topic = topic,
            difficulty = difficulty.as_str(),
        )
    }

    /// 复习清单提示词
    pub fn review(topic: &str) -> String {
        format!(
            r#"Generate a concise "review sheet" for the topic of "{topic}". It should be a quick summary of the most important concepts, formulas, and definitions. Use bullet points or numbered lists for easy readability.

Follow formatting rules strictly:
- Use Markdown for headings and lists.
- For ALL mathematical expressions, use LaTeX syntax. This is critical."#,
        )
    }

    /// 单道多步挑战题提示词，不预先给出解答
    pub fn challenge(topic: &str) -> String {
        format!(
            r#"Generate a single, challenging, multi-step problem for the topic of "{topic}". The problem should require a deeper understanding of the concepts. Present the problem clearly, then encourage the user to try solving it. Do NOT provide the solution upfront.

Follow formatting rules strictly:
- Use Markdown for formatting.
- For ALL mathematical expressions, use LaTeX syntax. This is critical."#,
        )
    }

    /// 代数题逐步讲解提示词
    pub fn algebra_explanation(equation: &str) -> String {
        format!(
            r#"Provide a clear, step-by-step explanation for how to solve the following algebraic equation for 'x':
Equation: "{equation}"

Your explanation should be easy for a middle school student to understand.
Break down each step logically.

Strictly follow these formatting rules:
- Use Markdown for lists and emphasis.
- For ALL mathematical expressions, variables (like 'x'), numbers, and equations, use LaTeX syntax. Wrap inline math with single dollar signs and block-level equations with double dollar signs. This is critical for rendering."#,
        )
    }

    /// 三题选择测验提示词，要求纯 JSON 输出
    pub fn quiz(topic: &str) -> String {
        format!(
            r#"Generate a 3-question multiple-choice quiz about "{topic}". Each question should have 4 options. Ensure the questions cover fundamental concepts of the topic. Ensure there is only one correct answer per question. For any math in the questions or options, use inline LaTeX.

Output format (JSON):
{{
  "questions": [
    {{
      "questionText": "...",
      "options": ["...", "...", "...", "..."],
      "correctAnswerIndex": 0
    }}
  ]
}}

Output only the JSON, no other text."#,
        )
    }

    /// 测验反馈提示词，基于判卷明细
    pub fn quiz_feedback(topic: &str, results: &[QuizQuestionResult]) -> String {
        let details = serde_json::to_string_pretty(results).unwrap_or_else(|_| "[]".to_string());
        format!(
            r#"A student just took a quiz on "{topic}". Here are their results:
{details}

Please provide a brief, encouraging, and helpful feedback message for the student based on their performance.
- If they did well, congratulate them.
- For any questions they got wrong, briefly explain the correct concept without being too verbose.
- Maintain the persona of a friendly and supportive math tutor.
- Use Markdown and LaTeX for formatting."#,
        )
    }

    /// 按会话模式追加的指令
    pub fn mode_instruction(mode: TutorMode, topic: &str) -> String {
        let mut instruction = format!(
            "The user is currently in \"{}\" mode for the topic \"{}\". Tailor your response accordingly.",
            mode.as_str(),
            topic
        );
        let extra = match mode {
            TutorMode::Challenge => {
                " In \"Challenge\" mode, avoid giving the full answer away too easily. Guide the user with hints."
            }
            TutorMode::Review => {
                " In \"Review\" mode, keep things concise and focused on key formulas and concepts."
            }
            TutorMode::Practice => {
                " In \"Practice\" mode, your main goal is to provide practice problems based on the user's request. When they submit a request, generate a suitable problem. Then, guide them through solving it step-by-step."
            }
            TutorMode::Lesson => {
                " In \"Lesson\" mode, focus on teaching the concepts from scratch."
            }
        };
        instruction.push_str(extra);
        instruction
    }
}

/// 练习模式的开场白，不经过模型
pub fn practice_intro(topic: &str) -> String {
    format!(
        r#"Welcome to **Practice Mode** for {topic}!

Tell me what kind of problem you want to work on. You can be specific! For example:

*   "Give me a problem about finding the area of a triangle."
*   "I need to practice solving two-step equations."
*   "Can you create a word problem involving percentages?"

Let's get practicing! Just type your request below."#,
    )
}

// ==================== 本地判卷 ====================

/// 本地判卷：逐题比对后折算 0-100 的整数分
///
/// 缺答按错误计；这里算出的分数随后喂给间隔复习服务。
pub fn grade_quiz(questions: &[QuizProblem], answers: &[Option<usize>]) -> QuizGrade {
    let mut correct_count = 0u32;
    let results: Vec<QuizQuestionResult> = questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let picked = answers.get(i).copied().flatten();
            let is_correct = picked == Some(question.correct_answer_index);
            if is_correct {
                correct_count += 1;
            }

            let user_answer = picked
                .and_then(|idx| question.options.get(idx).cloned())
                .unwrap_or_else(|| "Not answered".to_string());
            let correct_answer = question
                .options
                .get(question.correct_answer_index)
                .cloned()
                .unwrap_or_default();

            QuizQuestionResult {
                question: question.question_text.clone(),
                user_answer,
                correct_answer,
                is_correct,
            }
        })
        .collect();

    let score = if questions.is_empty() {
        0
    } else {
        ((correct_count as f64 / questions.len() as f64) * 100.0).round() as u32
    };

    QuizGrade { score, results }
}

// ==================== 响应解析 ====================

#[derive(Debug, Deserialize)]
struct QuizPayload {
    questions: Vec<QuizProblem>,
}

/// 从模型回复里取出 JSON 正文，容忍 ``` 代码栅栏
fn extract_json_payload(text: &str) -> String {
    let fence = Regex::new(r"(?s)```(?:json)?\s*(.+?)\s*```").unwrap();
    match fence.captures(text) {
        Some(cap) => cap[1].to_string(),
        None => text.trim().to_string(),
    }
}

/// 解析测验 JSON；接受 {"questions": [...]} 或裸数组两种形态
pub fn parse_quiz_response(text: &str) -> Result<Vec<QuizProblem>> {
    let payload = extract_json_payload(text);

    if let Ok(wrapped) = serde_json::from_str::<QuizPayload>(&payload) {
        return Ok(wrapped.questions);
    }
    serde_json::from_str::<Vec<QuizProblem>>(&payload)
        .context("failed to parse quiz questions from model response")
}

// ==================== 接口客户端 ====================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
    }
}

/// 导师接口客户端
#[derive(Clone)]
pub struct TutorClient {
    config: TutorConfig,
    http_client: reqwest::Client,
}

impl TutorClient {
    pub fn new(config: TutorConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.config.api_base, self.config.model, method, self.config.api_key
        )
    }

    fn build_request(prompt: &str, system: Option<&str>, json_output: bool) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: system.map(|text| Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }),
            generation_config: json_output.then(|| GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        }
    }

    /// 一次性补全
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        self.generate_inner(prompt, system, false).await
    }

    async fn generate_inner(
        &self,
        prompt: &str,
        system: Option<&str>,
        json_output: bool,
    ) -> Result<String> {
        let url = self.endpoint("generateContent");
        let request = Self::build_request(prompt, system, json_output);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        response
            .first_text()
            .ok_or_else(|| anyhow!("model response contained no candidates"))
    }

    /// 生成课程
    pub async fn generate_lesson(&self, topic: &str, difficulty: Difficulty) -> Result<String> {
        self.generate(&TutorPrompt::lesson(topic, difficulty), Some(SYSTEM_INSTRUCTION))
            .await
    }

    /// 生成复习清单
    pub async fn generate_review(&self, topic: &str) -> Result<String> {
        self.generate(&TutorPrompt::review(topic), Some(SYSTEM_INSTRUCTION))
            .await
    }

    /// 生成挑战题
    pub async fn generate_challenge(&self, topic: &str) -> Result<String> {
        self.generate(&TutorPrompt::challenge(topic), Some(SYSTEM_INSTRUCTION))
            .await
    }

    /// 生成代数讲解
    pub async fn explain_algebra(&self, equation: &str) -> Result<String> {
        self.generate(&TutorPrompt::algebra_explanation(equation), None)
            .await
    }

    /// 生成测验并解析为结构化题目
    pub async fn generate_quiz(&self, topic: &str) -> Result<Vec<QuizProblem>> {
        let text = self
            .generate_inner(&TutorPrompt::quiz(topic), None, true)
            .await?;
        parse_quiz_response(&text)
    }

    /// 根据判卷结果生成反馈文本
    pub async fn quiz_feedback(&self, topic: &str, grade: &QuizGrade) -> Result<String> {
        self.generate(&TutorPrompt::quiz_feedback(topic, &grade.results), None)
            .await
    }

    /// 流式补全，逐段产出文本
    pub async fn generate_stream(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<impl Stream<Item = Result<String>> + Unpin> {
        let url = format!("{}&alt=sse", self.endpoint("streamGenerateContent"));
        let request = Self::build_request(prompt, system, false);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let mut bytes = Box::pin(response.bytes_stream());

        Ok(Box::pin(stream! {
            let mut buffer = String::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        yield Err(err.into());
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(pos) = buffer.find('\n') {
                    let line = buffer[..pos].trim().to_string();
                    buffer.drain(..=pos);

                    let Some(payload) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    if payload == "[DONE]" {
                        return;
                    }

                    // 跳过无法解析的行，继续读下一段
                    if let Ok(parsed) = serde_json::from_str::<GenerateResponse>(payload) {
                        if let Some(text) = parsed.first_text() {
                            yield Ok(text);
                        }
                    }
                }
            }
        }))
    }
}
