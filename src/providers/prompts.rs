//! Fixed instruction templates.

use crate::types::Mode;

/// Writing-assistant persona sent as the system instruction.
pub const SYSTEM_PROMPT: &str = "你和用户一起结对写作来解决他们的问题。你是一位世界一流的专业AI作家助手。
你的任务是根据用户输入的消息，回答用户的问题。

范围限制：
1. 拒绝所有非文学相关问题
2. 避免任何政治内容和极端露骨的情色描写
3. 必须虚构所有国家、地名、机构名称等

输出要求：
1. 禁止一切与推动剧情无关的描述
2. 每一句的长度不宜过长
3. 禁止使用过度修饰的词汇
4. 绝不编造信息
5. 正文输出的结尾不要有展望总结式语句，留下悬念即可";

pub const EXPAND_MODE_PROMPT: &str = "请对以下内容进行扩写。要求：
1. 增加细节描写和心理活动
2. 丰富对话和人物互动
3. 补充场景描写
4. 字数增加50%以上
5. 保持原意不变";

pub const POLISH_MODE_PROMPT: &str = "请对以下内容进行润色。要求：
1. 改进表达方式
2. 增强可读性
3. 修正语法错误
4. 优化措辞
5. 保持字数基本不变";

const CONTENT_LABEL: &str = "内容：";

impl Mode {
    /// Instruction template prefixed to the user's content.
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::Expand => EXPAND_MODE_PROMPT,
            Self::Polish => POLISH_MODE_PROMPT,
        }
    }
}

/// The logical message pair every provider receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

impl Prompt {
    pub fn new(mode: Mode, content: &str) -> Self {
        Self {
            system: SYSTEM_PROMPT,
            user: format!("{}\n\n{CONTENT_LABEL}\n{content}", mode.instruction()),
        }
    }

    /// System and user text folded into a single turn, for providers
    /// without a system role.
    pub fn single_turn(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}
