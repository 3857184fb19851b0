//! Essay prompts and sample essays, browsed college by college

/// What the essay browser currently shows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EssayBrowser {
    colleges: Vec<String>,
    selected_college: Option<String>,
    prompts: Vec<String>,
    /// The prompt whose essays are unfolded, if any
    visible_prompt: Option<String>,
    essays: Vec<String>,
}

impl EssayBrowser {
    pub fn new(colleges: Vec<String>) -> Self {
        Self { colleges, ..Self::default() }
    }

    pub fn colleges(&self) -> &[String]                 { &self.colleges }
    pub fn selected_college(&self) -> Option<&str>      { self.selected_college.as_deref() }
    pub fn prompts(&self) -> &[String]                  { &self.prompts }
    pub fn visible_prompt(&self) -> Option<&str>        { self.visible_prompt.as_deref() }
    pub fn essays(&self) -> &[String]                   { &self.essays }

    /// Show the prompts of another college. This folds any unfolded prompt.
    pub fn show_prompts<S: ToString>(&mut self, college: S, prompts: Vec<String>) {
        self.selected_college = Some(college.to_string());
        self.prompts = prompts;
        self.visible_prompt = None;
        self.essays.clear();
    }

    /// Unfold the essays of a prompt. Showing the essays of the prompt that is already unfolded folds it.
    pub fn toggle_essays<S: ToString>(&mut self, prompt: S, essays: Vec<String>) {
        let prompt = prompt.to_string();
        if self.visible_prompt.as_ref() == Some(&prompt) {
            self.visible_prompt = None;
            self.essays.clear();
        } else {
            self.visible_prompt = Some(prompt);
            self.essays = essays;
        }
    }
}
